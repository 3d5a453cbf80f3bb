//! Link access evaluation and credentialed authentication.

pub mod outcome;
pub mod service;

pub use outcome::{AccessEvaluation, GrantedAccess};
pub use service::AccessService;
