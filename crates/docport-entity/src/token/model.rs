//! Access token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::link::LinkPermissions;

/// An ephemeral bearer capability tying a granted session to a link.
///
/// The permission set is copied from the link at issuance and never
/// re-read, so later policy edits do not affect tokens already in flight.
/// Expired tokens are inert; they are pruned lazily on lookup rather than
/// eagerly deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// Unguessable token value (64 hex characters).
    pub token: String,
    /// The link this token is scoped to.
    pub link_id: Uuid,
    /// The document behind the link.
    pub document_id: Uuid,
    /// Email granted through the email factor (if any).
    pub email: Option<String>,
    /// Permission snapshot taken at issuance.
    pub permissions: LinkPermissions,
    /// Issuance time.
    pub created_at: DateTime<Utc>,
    /// Fixed expiry, TTL from issuance (not sliding).
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token is valid for the given link as of `now`.
    pub fn is_valid_for(&self, link_id: Uuid, now: DateTime<Utc>) -> bool {
        self.link_id == link_id && !self.is_expired(now)
    }
}
