//! Credential bundles and requirement descriptions.

use serde::{Deserialize, Serialize};

/// Caller-supplied credentials for the credentialed grant path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialBundle {
    /// Visitor email address.
    pub email: Option<String>,
    /// Link password.
    pub password: Option<String>,
    /// Whether the visitor accepted the displayed NDA terms.
    pub accept_terms: bool,
    /// Captcha response token.
    pub captcha_token: Option<String>,
}

impl CredentialBundle {
    /// The supplied email, trimmed and lowercased.
    pub fn normalized_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
    }
}

/// Which factors a link requires, returned by the no-credential probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequirements {
    /// An email address must be supplied.
    pub email: bool,
    /// A password must be supplied.
    pub password: bool,
    /// The NDA terms must be accepted.
    pub nda: bool,
    /// A captcha token must be supplied.
    pub captcha: bool,
    /// NDA text for client display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nda_text: Option<String>,
    /// Owner-supplied message for client display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}
