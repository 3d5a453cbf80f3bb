//! The ordered authorization gate chain.
//!
//! Every inbound request against a share link passes through the same
//! fixed sequence of gates. The chain short-circuits on the first failing
//! gate, which defines precedence when several conditions are violated at
//! once.

pub mod credentials;
pub mod evaluator;
pub mod outcome;

pub use credentials::{CredentialBundle, CredentialRequirements};
pub use evaluator::PolicyEvaluator;
pub use outcome::{AuthMode, DenialCode, GateOutcome};
