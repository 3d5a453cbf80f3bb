//! Response DTOs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docport_auth::gate::CredentialRequirements;
use docport_entity::document::DocumentRef;
use docport_entity::link::{LinkAnalytics, LinkPermissions};
use docport_service::GrantedAccess;

/// Returned when the link has credential factors and none were supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsResponse {
    /// Always `true` on this variant.
    pub requires_auth: bool,
    /// Which factors the caller must supply.
    pub requirements: CredentialRequirements,
}

impl RequirementsResponse {
    /// Wraps a requirement listing.
    pub fn new(requirements: CredentialRequirements) -> Self {
        Self {
            requires_auth: true,
            requirements,
        }
    }
}

/// Engagement analytics summary exposed to granted viewers.
///
/// Visitor fingerprints stay internal; only the distinct count leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Number of distinct visitors.
    pub unique_visitor_count: usize,
    /// View counts keyed by country code.
    pub views_by_country: HashMap<String, i64>,
    /// View counts keyed by device class.
    pub views_by_device: HashMap<String, i64>,
    /// Running average dwell time in seconds.
    pub average_view_time_seconds: f64,
    /// Total downloads through this link.
    pub total_downloads: i64,
    /// Last recorded grant.
    pub last_accessed: Option<DateTime<Utc>>,
}

impl From<&LinkAnalytics> for AnalyticsSummary {
    fn from(analytics: &LinkAnalytics) -> Self {
        Self {
            unique_visitor_count: analytics.unique_visitor_count(),
            views_by_country: analytics.views_by_country.clone(),
            views_by_device: analytics.views_by_device.clone(),
            average_view_time_seconds: analytics.average_view_time_seconds,
            total_downloads: analytics.total_downloads,
            last_accessed: analytics.last_accessed,
        }
    }
}

/// Returned on a granted session, from either access path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrantedResponse {
    /// Always `true` on this variant.
    pub access_granted: bool,
    /// Bearer token for engagement calls; credentialed path only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// The document behind the link.
    pub document: DocumentRef,
    /// Permissions granted to this session.
    pub permissions: LinkPermissions,
    /// Analytics snapshot; no-credential path only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsSummary>,
    /// Render a visitor watermark over the document.
    pub watermark_enabled: bool,
    /// Disallow forwarding of the link.
    pub disable_forwarding: bool,
    /// Owner-supplied message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    /// Redirect target after a credentialed grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl AccessGrantedResponse {
    /// Shapes a grant from the no-credential GET path.
    pub fn for_view(granted: GrantedAccess) -> Self {
        Self {
            access_granted: true,
            access_token: None,
            analytics: Some(AnalyticsSummary::from(&granted.link.analytics)),
            permissions: granted.link.permissions,
            watermark_enabled: granted.link.watermark_enabled,
            disable_forwarding: granted.link.disable_forwarding,
            custom_message: granted.link.custom_message,
            redirect_url: None,
            document: granted.document,
        }
    }

    /// Shapes a grant from the credentialed POST path.
    pub fn for_session(granted: GrantedAccess) -> Self {
        Self {
            access_granted: true,
            access_token: granted.token.map(|t| t.token),
            analytics: None,
            permissions: granted.link.permissions,
            watermark_enabled: granted.link.watermark_enabled,
            disable_forwarding: granted.link.disable_forwarding,
            custom_message: granted.link.custom_message,
            redirect_url: granted.link.redirect_url,
            document: granted.document,
        }
    }
}

/// Acknowledgement for engagement tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedResponse {
    /// Always `true`.
    pub success: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when the gateway is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}
