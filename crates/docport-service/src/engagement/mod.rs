//! Token-scoped engagement tracking.

pub mod service;

pub use service::{EngagementInput, EngagementService};
