//! Gate chain outcomes and denial codes.

use serde::{Deserialize, Serialize};

use super::credentials::CredentialRequirements;

/// Stable machine-readable denial codes, one per gate failure.
///
/// The policy evaluator is the only component that produces these; the
/// HTTP layer maps them to statuses but never invents or rewrites them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DenialCode {
    /// The owner disabled the link.
    LinkDisabled,
    /// The link's expiry timestamp has passed.
    LinkExpired,
    /// The configured access quota is consumed.
    MaxAccessReached,
    /// The email factor is enabled and no email was supplied.
    EmailRequired,
    /// The supplied email failed the allow/deny/domain lists.
    EmailNotAllowed,
    /// The password factor is enabled and no password was supplied.
    PasswordRequired,
    /// The supplied password did not match the stored hash.
    InvalidPassword,
    /// The NDA factor is enabled and the terms were not accepted.
    NdaRequired,
    /// The captcha factor is enabled and no token was supplied or verified.
    CaptchaRequired,
}

impl DenialCode {
    /// The stable wire code clients branch on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkDisabled => "LINK_DISABLED",
            Self::LinkExpired => "LINK_EXPIRED",
            Self::MaxAccessReached => "MAX_ACCESS_REACHED",
            Self::EmailRequired => "EMAIL_REQUIRED",
            Self::EmailNotAllowed => "EMAIL_NOT_ALLOWED",
            Self::PasswordRequired => "PASSWORD_REQUIRED",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::NdaRequired => "NDA_REQUIRED",
            Self::CaptchaRequired => "CAPTCHA_REQUIRED",
        }
    }

    /// Human-readable companion message, distinct from the wire code.
    pub fn message(&self) -> &'static str {
        match self {
            Self::LinkDisabled => "This link has been disabled",
            Self::LinkExpired => "This link has expired",
            Self::MaxAccessReached => "This link has reached its maximum number of views",
            Self::EmailRequired => "An email address is required to view this document",
            Self::EmailNotAllowed => "This email address is not authorized to view this document",
            Self::PasswordRequired => "A password is required to view this document",
            Self::InvalidPassword => "Incorrect password",
            Self::NdaRequired => "You must accept the terms to view this document",
            Self::CaptchaRequired => "Captcha verification is required",
        }
    }
}

impl std::fmt::Display for DenialCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a granted session was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// No credential factor was involved.
    Anonymous,
    /// At least one credential factor was satisfied.
    Authenticated,
}

/// Result of running the gate chain against a link.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Every gate passed.
    Granted(AuthMode),
    /// Credential factors are enabled and no bundle was supplied.
    /// Side-effect-free: nothing is recorded or mutated.
    NeedsCredentials(CredentialRequirements),
    /// A gate failed.
    Denied(DenialCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_are_stable() {
        assert_eq!(DenialCode::LinkDisabled.as_str(), "LINK_DISABLED");
        assert_eq!(DenialCode::LinkExpired.as_str(), "LINK_EXPIRED");
        assert_eq!(DenialCode::MaxAccessReached.as_str(), "MAX_ACCESS_REACHED");
        assert_eq!(DenialCode::EmailRequired.as_str(), "EMAIL_REQUIRED");
        assert_eq!(DenialCode::EmailNotAllowed.as_str(), "EMAIL_NOT_ALLOWED");
        assert_eq!(DenialCode::PasswordRequired.as_str(), "PASSWORD_REQUIRED");
        assert_eq!(DenialCode::InvalidPassword.as_str(), "INVALID_PASSWORD");
        assert_eq!(DenialCode::NdaRequired.as_str(), "NDA_REQUIRED");
        assert_eq!(DenialCode::CaptchaRequired.as_str(), "CAPTCHA_REQUIRED");
    }
}
