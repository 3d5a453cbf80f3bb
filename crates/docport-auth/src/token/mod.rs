//! Access token issuance.

pub mod issuer;

pub use issuer::TokenIssuer;
