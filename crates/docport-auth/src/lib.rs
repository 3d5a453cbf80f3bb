//! # docport-auth
//!
//! Authorization primitives for the DocPort gateway: the ordered gate
//! chain (policy evaluator), visitor identity derivation, Argon2id link
//! password hashing, and access token issuance.

pub mod gate;
pub mod identity;
pub mod password;
pub mod token;

pub use gate::{CredentialBundle, CredentialRequirements, DenialCode, GateOutcome, PolicyEvaluator};
pub use password::PasswordHasher;
pub use token::TokenIssuer;
