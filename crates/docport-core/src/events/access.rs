//! Link access domain events.
//!
//! These are the payloads handed to the notification dispatcher when the
//! link owner opted into access notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to share link access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessEvent {
    /// A visitor was granted access to a link.
    Granted {
        /// The link ID.
        link_id: Uuid,
        /// The document behind the link.
        document_id: Uuid,
        /// Derived visitor fingerprint.
        visitor_id: String,
        /// Email supplied during authentication (if any).
        email: Option<String>,
        /// Resolved country code, `"unknown"` if the geo header was absent.
        country: String,
        /// Access count after this grant.
        access_count: i64,
        /// When the grant happened.
        occurred_at: DateTime<Utc>,
    },
    /// A visitor was denied access.
    Denied {
        /// The link ID.
        link_id: Uuid,
        /// Stable machine-readable denial code.
        code: String,
        /// Derived visitor fingerprint.
        visitor_id: String,
        /// When the denial happened.
        occurred_at: DateTime<Utc>,
    },
    /// A shared document was downloaded through a link.
    Downloaded {
        /// The link ID.
        link_id: Uuid,
        /// Total downloads after this one.
        total_downloads: i64,
        /// When the download happened.
        occurred_at: DateTime<Utc>,
    },
    /// A visitor accepted the NDA attached to a link.
    NdaAccepted {
        /// The link ID.
        link_id: Uuid,
        /// Email supplied alongside the acceptance (if any).
        email: Option<String>,
        /// When the acceptance happened.
        occurred_at: DateTime<Utc>,
    },
}
