//! Request DTOs.

use serde::{Deserialize, Serialize};

use docport_auth::gate::CredentialBundle;
use docport_service::EngagementInput;

/// Body of `POST /api/links/{link_id}/access`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    /// Visitor email address.
    pub email: Option<String>,
    /// Link password.
    pub password: Option<String>,
    /// Whether the visitor accepted the displayed NDA terms.
    #[serde(default)]
    pub accept_terms: bool,
    /// Captcha response token.
    pub captcha_token: Option<String>,
}

impl From<AccessRequest> for CredentialBundle {
    fn from(req: AccessRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            accept_terms: req.accept_terms,
            captcha_token: req.captcha_token,
        }
    }
}

/// Body of `PATCH /api/links/{link_id}/engagement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRequest {
    /// The bearer token minted at grant time.
    pub access_token: String,
    /// Wire form of the action.
    pub action: String,
    /// Page number for page-scoped events.
    pub page_number: Option<i32>,
    /// Reported dwell time in seconds.
    pub time_spent: Option<f64>,
    /// Free-form caller metadata.
    pub metadata: Option<serde_json::Value>,
}

impl From<EngagementRequest> for EngagementInput {
    fn from(req: EngagementRequest) -> Self {
        Self {
            access_token: req.access_token,
            action: req.action,
            page_number: req.page_number,
            time_spent: req.time_spent,
            metadata: req.metadata,
        }
    }
}
