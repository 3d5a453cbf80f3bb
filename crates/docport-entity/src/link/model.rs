//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analytics::LinkAnalytics;

/// Permission set granted by a link.
///
/// Copied by value into every issued access token, so a later policy edit
/// on the link never changes what an existing token allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPermissions {
    /// Viewing the document.
    pub can_view: bool,
    /// Downloading the document bytes.
    pub can_download: bool,
    /// Editing the document.
    pub can_edit: bool,
    /// Re-sharing the link.
    pub can_share: bool,
    /// Viewing the link's engagement analytics.
    pub can_view_analytics: bool,
}

impl Default for LinkPermissions {
    fn default() -> Self {
        Self {
            can_view: true,
            can_download: false,
            can_edit: false,
            can_share: false,
            can_view_analytics: false,
        }
    }
}

/// A shareable link granting scoped access to one document.
///
/// The link carries its own authorization policy and analytics snapshot.
/// `access_count` is monotonically increasing and only ever mutated by the
/// store's atomic operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    /// Unique link identifier.
    pub id: Uuid,
    /// The document this link exposes.
    pub document_id: Uuid,
    /// Whether the owner disabled the link.
    pub disabled: bool,
    /// When the link expires (if set).
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of grants (None = unlimited).
    pub max_access_count: Option<i64>,
    /// Number of grants so far. Never decremented.
    pub access_count: i64,

    /// Require an email address before granting.
    pub require_email: bool,
    /// Require a password before granting.
    pub require_password: bool,
    /// Argon2id hash of the link password.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    /// Require NDA acceptance before granting.
    pub require_nda: bool,
    /// NDA text shown to the visitor.
    pub nda_text: Option<String>,
    /// Require a captcha token before granting.
    pub require_captcha: bool,
    /// Email whitelist (empty = any email).
    pub allowed_emails: Vec<String>,
    /// Email blacklist.
    pub blocked_emails: Vec<String>,
    /// Domain whitelist (empty = any domain).
    pub allowed_domains: Vec<String>,

    /// Permissions granted on access.
    pub permissions: LinkPermissions,
    /// Render a visitor watermark over the document.
    pub watermark_enabled: bool,
    /// Disallow forwarding of the link.
    pub disable_forwarding: bool,
    /// Owner-supplied message shown alongside the document.
    pub custom_message: Option<String>,
    /// Redirect target after a credentialed grant.
    pub redirect_url: Option<String>,
    /// Whether the owner opted into access notifications.
    pub notify_on_access: bool,

    /// Engagement analytics snapshot.
    pub analytics: LinkAnalytics,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    /// Creates an open link (no policy factors) to a document.
    pub fn new(document_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            disabled: false,
            expires_at: None,
            max_access_count: None,
            access_count: 0,
            require_email: false,
            require_password: false,
            password_hash: None,
            require_nda: false,
            nda_text: None,
            require_captcha: false,
            allowed_emails: Vec::new(),
            blocked_emails: Vec::new(),
            allowed_domains: Vec::new(),
            permissions: LinkPermissions::default(),
            watermark_enabled: false,
            disable_forwarding: false,
            custom_message: None,
            redirect_url: None,
            notify_on_access: false,
            analytics: LinkAnalytics::default(),
            created_at: Utc::now(),
        }
    }

    /// Whether any credential factor is enabled on this link.
    pub fn requires_credentials(&self) -> bool {
        self.require_email || self.require_password || self.require_nda || self.require_captcha
    }

    /// Whether the link has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }

    /// Whether the configured access quota has been consumed.
    ///
    /// Advisory only: the authoritative check is the store's bounded
    /// increment, which combines it with the count update atomically.
    pub fn quota_exhausted(&self) -> bool {
        self.max_access_count
            .is_some_and(|max| self.access_count >= max)
    }
}
