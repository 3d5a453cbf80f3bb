//! Audit record entity models.
//!
//! Every record here is write-once: the gateway appends and never updates
//! or deletes. Audit streams are not used for quota enforcement, so a
//! duplicated append on retry is acceptable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of access evaluation that produced an attempt record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// The no-credential read path.
    View,
    /// The credentialed grant path.
    AuthenticatedView,
}

impl AccessAction {
    /// Stable string form for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::AuthenticatedView => "authenticated_view",
        }
    }
}

/// The outcome of a single access evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "code")]
pub enum AccessOutcome {
    /// Access was granted.
    Granted,
    /// The link requires credentials that were not supplied.
    RequiresCredentials,
    /// Access was denied with a specific gate code.
    Denied(String),
}

/// One record per GET/POST evaluation, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessAttempt {
    /// Unique record identifier.
    pub id: Uuid,
    /// The evaluated link.
    pub link_id: Uuid,
    /// The document behind the link.
    pub document_id: Uuid,
    /// Derived visitor fingerprint.
    pub visitor_id: String,
    /// Email supplied with the attempt (if any).
    pub email: Option<String>,
    /// Resolved country code.
    pub country: String,
    /// Classified device string.
    pub device: String,
    /// Raw user agent (if present).
    pub user_agent: Option<String>,
    /// Referrer header (if present).
    pub referrer: Option<String>,
    /// Which path produced the record.
    pub action: AccessAction,
    /// How the evaluation ended.
    pub outcome: AccessOutcome,
    /// When the evaluation happened.
    pub occurred_at: DateTime<Utc>,
}

/// A failed password attempt, recorded separately from the access stream.
///
/// This is the hook point for lockout/alerting policies layered on top;
/// none are implemented in this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordFailure {
    /// Unique record identifier.
    pub id: Uuid,
    /// The link whose password was wrong.
    pub link_id: Uuid,
    /// Email supplied with the attempt (if any).
    pub email: Option<String>,
    /// Derived visitor fingerprint.
    pub visitor_id: String,
    /// When the failure happened.
    pub occurred_at: DateTime<Utc>,
}

/// A recorded confirmation that a visitor accepted displayed NDA terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NdaAcceptance {
    /// Unique record identifier.
    pub id: Uuid,
    /// The link whose NDA was accepted.
    pub link_id: Uuid,
    /// Email supplied alongside the acceptance (if any).
    pub email: Option<String>,
    /// Derived visitor fingerprint.
    pub visitor_id: String,
    /// When the acceptance happened.
    pub occurred_at: DateTime<Utc>,
}

/// Post-grant engagement signal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementAction {
    /// A page was viewed.
    PageView,
    /// The document was downloaded.
    Download,
    /// Dwell time was reported.
    TimeSpent,
    /// The visitor reached the end of the document.
    Completed,
}

impl EngagementAction {
    /// Stable string form for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::Download => "download",
            Self::TimeSpent => "time_spent",
            Self::Completed => "completed",
        }
    }

    /// Parse the wire form of an action.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "page_view" => Some(Self::PageView),
            "download" => Some(Self::Download),
            "time_spent" => Some(Self::TimeSpent),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// One record per engagement-tracking call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// The link the token was scoped to.
    pub link_id: Uuid,
    /// Email granted on the token (if any).
    pub email: Option<String>,
    /// The reported action.
    pub action: EngagementAction,
    /// Page number for page-scoped events.
    pub page_number: Option<i32>,
    /// Reported dwell time in seconds.
    pub seconds: Option<f64>,
    /// Free-form caller metadata.
    pub metadata: serde_json::Value,
    /// When the event was reported.
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engagement_action_round_trips() {
        for action in [
            EngagementAction::PageView,
            EngagementAction::Download,
            EngagementAction::TimeSpent,
            EngagementAction::Completed,
        ] {
            assert_eq!(EngagementAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(EngagementAction::parse("print"), None);
    }
}
