//! Append-only audit record entities.

pub mod model;

pub use model::{
    AccessAction, AccessAttempt, AccessOutcome, EngagementAction, EngagementRecord, NdaAcceptance,
    PasswordFailure,
};
