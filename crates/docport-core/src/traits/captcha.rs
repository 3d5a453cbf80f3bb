//! Captcha verification trait.
//!
//! Third-party captcha verification is an external collaborator. The gate
//! chain itself only checks token presence; this trait is consulted on the
//! credentialed path so a real verifier can be injected.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for captcha token verification backends.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Returns `true` if the supplied captcha token is valid.
    async fn verify(&self, token: &str) -> AppResult<bool>;
}

/// Default verifier: accepts any non-empty token.
///
/// Stands in until a provider-backed verifier is wired up.
#[derive(Debug, Clone, Default)]
pub struct PresenceVerifier;

#[async_trait]
impl CaptchaVerifier for PresenceVerifier {
    async fn verify(&self, token: &str) -> AppResult<bool> {
        Ok(!token.trim().is_empty())
    }
}
