//! Row structs bridging PostgreSQL columns and domain entities.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use docport_entity::document::DocumentRef;
use docport_entity::link::{LinkAnalytics, LinkPermissions, ShareLink};
use docport_entity::token::AccessToken;

/// One `share_links` row.
#[derive(Debug, FromRow)]
pub struct LinkRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub disabled: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_access_count: Option<i64>,
    pub access_count: i64,
    pub require_email: bool,
    pub require_password: bool,
    pub password_hash: Option<String>,
    pub require_nda: bool,
    pub nda_text: Option<String>,
    pub require_captcha: bool,
    pub allowed_emails: Vec<String>,
    pub blocked_emails: Vec<String>,
    pub allowed_domains: Vec<String>,
    pub permissions: Json<LinkPermissions>,
    pub watermark_enabled: bool,
    pub disable_forwarding: bool,
    pub custom_message: Option<String>,
    pub redirect_url: Option<String>,
    pub notify_on_access: bool,
    pub unique_visitors: Vec<String>,
    pub views_by_country: Json<HashMap<String, i64>>,
    pub views_by_device: Json<HashMap<String, i64>>,
    pub average_view_time_seconds: f64,
    pub total_downloads: i64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<LinkRow> for ShareLink {
    fn from(row: LinkRow) -> Self {
        ShareLink {
            id: row.id,
            document_id: row.document_id,
            disabled: row.disabled,
            expires_at: row.expires_at,
            max_access_count: row.max_access_count,
            access_count: row.access_count,
            require_email: row.require_email,
            require_password: row.require_password,
            password_hash: row.password_hash,
            require_nda: row.require_nda,
            nda_text: row.nda_text,
            require_captcha: row.require_captcha,
            allowed_emails: row.allowed_emails,
            blocked_emails: row.blocked_emails,
            allowed_domains: row.allowed_domains,
            permissions: row.permissions.0,
            watermark_enabled: row.watermark_enabled,
            disable_forwarding: row.disable_forwarding,
            custom_message: row.custom_message,
            redirect_url: row.redirect_url,
            notify_on_access: row.notify_on_access,
            analytics: LinkAnalytics {
                unique_visitors: row.unique_visitors,
                views_by_country: row.views_by_country.0,
                views_by_device: row.views_by_device.0,
                average_view_time_seconds: row.average_view_time_seconds,
                total_downloads: row.total_downloads,
                last_accessed: row.last_accessed,
            },
            created_at: row.created_at,
        }
    }
}

/// One `documents` row.
#[derive(Debug, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    pub page_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentRow> for DocumentRef {
    fn from(row: DocumentRow) -> Self {
        DocumentRef {
            id: row.id,
            name: row.name,
            content_type: row.content_type,
            page_count: row.page_count,
            created_at: row.created_at,
        }
    }
}

/// One `access_tokens` row.
#[derive(Debug, FromRow)]
pub struct TokenRow {
    pub token: String,
    pub link_id: Uuid,
    pub document_id: Uuid,
    pub email: Option<String>,
    pub permissions: Json<LinkPermissions>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<TokenRow> for AccessToken {
    fn from(row: TokenRow) -> Self {
        AccessToken {
            token: row.token,
            link_id: row.link_id,
            document_id: row.document_id,
            email: row.email,
            permissions: row.permissions.0,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}
