//! PostgreSQL link store implementation.
//!
//! Every mutating operation is a single SQL statement, so the quota and
//! analytics invariants hold under concurrent request handlers without
//! any in-process locking.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use docport_core::error::{AppError, ErrorKind};
use docport_core::result::AppResult;
use docport_entity::audit::{
    AccessAttempt, AccessOutcome, EngagementRecord, NdaAcceptance, PasswordFailure,
};
use docport_entity::document::DocumentRef;
use docport_entity::link::ShareLink;
use docport_entity::token::AccessToken;
use docport_entity::visitor::Visit;

use super::rows::{DocumentRow, LinkRow, TokenRow};
use crate::store::{LinkStore, ViewOutcome};

/// Link store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresLinkStore {
    pool: PgPool,
}

impl PostgresLinkStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn store_err(
        context: &'static str,
    ) -> impl FnOnce(sqlx::Error) -> AppError {
        move |e| AppError::with_source(ErrorKind::Store, context, e)
    }
}

#[async_trait]
impl LinkStore for PostgresLinkStore {
    async fn find_link(&self, link_id: Uuid) -> AppResult<Option<ShareLink>> {
        let row = sqlx::query_as::<_, LinkRow>("SELECT * FROM share_links WHERE id = $1")
            .bind(link_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::store_err("Failed to find link"))?;
        Ok(row.map(ShareLink::from))
    }

    async fn put_link(&self, link: &ShareLink) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO share_links (id, document_id, disabled, expires_at, max_access_count, \
             access_count, require_email, require_password, password_hash, require_nda, nda_text, \
             require_captcha, allowed_emails, blocked_emails, allowed_domains, permissions, \
             watermark_enabled, disable_forwarding, custom_message, redirect_url, notify_on_access, \
             unique_visitors, views_by_country, views_by_device, average_view_time_seconds, \
             total_downloads, last_accessed, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28) \
             ON CONFLICT (id) DO UPDATE SET \
             disabled = EXCLUDED.disabled, expires_at = EXCLUDED.expires_at, \
             max_access_count = EXCLUDED.max_access_count, \
             require_email = EXCLUDED.require_email, require_password = EXCLUDED.require_password, \
             password_hash = EXCLUDED.password_hash, require_nda = EXCLUDED.require_nda, \
             nda_text = EXCLUDED.nda_text, require_captcha = EXCLUDED.require_captcha, \
             allowed_emails = EXCLUDED.allowed_emails, blocked_emails = EXCLUDED.blocked_emails, \
             allowed_domains = EXCLUDED.allowed_domains, permissions = EXCLUDED.permissions, \
             watermark_enabled = EXCLUDED.watermark_enabled, \
             disable_forwarding = EXCLUDED.disable_forwarding, \
             custom_message = EXCLUDED.custom_message, redirect_url = EXCLUDED.redirect_url, \
             notify_on_access = EXCLUDED.notify_on_access",
        )
        .bind(link.id)
        .bind(link.document_id)
        .bind(link.disabled)
        .bind(link.expires_at)
        .bind(link.max_access_count)
        .bind(link.access_count)
        .bind(link.require_email)
        .bind(link.require_password)
        .bind(&link.password_hash)
        .bind(link.require_nda)
        .bind(&link.nda_text)
        .bind(link.require_captcha)
        .bind(&link.allowed_emails)
        .bind(&link.blocked_emails)
        .bind(&link.allowed_domains)
        .bind(Json(&link.permissions))
        .bind(link.watermark_enabled)
        .bind(link.disable_forwarding)
        .bind(&link.custom_message)
        .bind(&link.redirect_url)
        .bind(link.notify_on_access)
        .bind(&link.analytics.unique_visitors)
        .bind(Json(&link.analytics.views_by_country))
        .bind(Json(&link.analytics.views_by_device))
        .bind(link.analytics.average_view_time_seconds)
        .bind(link.analytics.total_downloads)
        .bind(link.analytics.last_accessed)
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err("Failed to upsert link"))?;
        Ok(())
    }

    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<DocumentRef>> {
        let row = sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE id = $1")
            .bind(document_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::store_err("Failed to find document"))?;
        Ok(row.map(DocumentRef::from))
    }

    async fn put_document(&self, document: &DocumentRef) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO documents (id, name, content_type, page_count, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, \
             content_type = EXCLUDED.content_type, page_count = EXCLUDED.page_count",
        )
        .bind(document.id)
        .bind(&document.name)
        .bind(&document.content_type)
        .bind(document.page_count)
        .bind(document.created_at)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err("Failed to upsert document"))?;
        Ok(())
    }

    async fn record_view(&self, link_id: Uuid, visit: &Visit) -> AppResult<ViewOutcome> {
        // Bounded increment: the quota condition and the counter merges
        // happen in one conditional update. Zero rows means the quota
        // condition declined (or the link vanished).
        let updated: Option<(i64,)> = sqlx::query_as(
            "UPDATE share_links SET \
             access_count = access_count + 1, \
             last_accessed = NOW(), \
             unique_visitors = CASE WHEN $2 = ANY(unique_visitors) THEN unique_visitors \
                 ELSE array_append(unique_visitors, $2) END, \
             views_by_country = jsonb_set(views_by_country, ARRAY[$3], \
                 to_jsonb(COALESCE((views_by_country->>$3)::bigint, 0) + 1), true), \
             views_by_device = jsonb_set(views_by_device, ARRAY[$4], \
                 to_jsonb(COALESCE((views_by_device->>$4)::bigint, 0) + 1), true) \
             WHERE id = $1 \
             AND (max_access_count IS NULL OR access_count < max_access_count) \
             RETURNING access_count",
        )
        .bind(link_id)
        .bind(&visit.visitor_id)
        .bind(&visit.country)
        .bind(visit.device.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::store_err("Failed to record view"))?;

        if let Some((access_count,)) = updated {
            return Ok(ViewOutcome::Recorded { access_count });
        }

        let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM share_links WHERE id = $1")
            .bind(link_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::store_err("Failed to check link existence"))?;

        if exists.is_some() {
            Ok(ViewOutcome::LimitReached)
        } else {
            Err(AppError::not_found("Link not found"))
        }
    }

    async fn record_download(&self, link_id: Uuid) -> AppResult<i64> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE share_links SET total_downloads = total_downloads + 1 \
             WHERE id = $1 RETURNING total_downloads",
        )
        .bind(link_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::store_err("Failed to record download"))?;

        row.map(|(count,)| count)
            .ok_or_else(|| AppError::not_found("Link not found"))
    }

    async fn record_view_time(&self, link_id: Uuid, seconds: f64) -> AppResult<f64> {
        // Incremental mean with access_count as the implicit sample count.
        let row: Option<(f64,)> = sqlx::query_as(
            "UPDATE share_links SET average_view_time_seconds = \
             ROUND((average_view_time_seconds * access_count + $2) / (access_count + 1)) \
             WHERE id = $1 RETURNING average_view_time_seconds",
        )
        .bind(link_id)
        .bind(seconds)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::store_err("Failed to record view time"))?;

        row.map(|(avg,)| avg)
            .ok_or_else(|| AppError::not_found("Link not found"))
    }

    async fn insert_token(&self, token: &AccessToken) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO access_tokens (token, link_id, document_id, email, permissions, \
             created_at, expires_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&token.token)
        .bind(token.link_id)
        .bind(token.document_id)
        .bind(&token.email)
        .bind(Json(&token.permissions))
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err("Failed to insert token"))?;
        Ok(())
    }

    async fn find_token(&self, value: &str) -> AppResult<Option<AccessToken>> {
        let row = sqlx::query_as::<_, TokenRow>("SELECT * FROM access_tokens WHERE token = $1")
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::store_err("Failed to find token"))?;
        Ok(row.map(AccessToken::from))
    }

    async fn delete_token(&self, value: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE token = $1")
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(Self::store_err("Failed to delete token"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_access_attempt(&self, record: &AccessAttempt) -> AppResult<()> {
        let (outcome, denial_code) = outcome_columns(&record.outcome);
        sqlx::query(
            "INSERT INTO access_attempts (id, link_id, document_id, visitor_id, email, country, \
             device, user_agent, referrer, action, outcome, denial_code, occurred_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(record.id)
        .bind(record.link_id)
        .bind(record.document_id)
        .bind(&record.visitor_id)
        .bind(&record.email)
        .bind(&record.country)
        .bind(&record.device)
        .bind(&record.user_agent)
        .bind(&record.referrer)
        .bind(record.action.as_str())
        .bind(outcome)
        .bind(denial_code)
        .bind(record.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err("Failed to append access attempt"))?;
        Ok(())
    }

    async fn append_password_failure(&self, record: &PasswordFailure) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO password_failures (id, link_id, email, visitor_id, occurred_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.id)
        .bind(record.link_id)
        .bind(&record.email)
        .bind(&record.visitor_id)
        .bind(record.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err("Failed to append password failure"))?;
        Ok(())
    }

    async fn append_nda_acceptance(&self, record: &NdaAcceptance) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO nda_acceptances (id, link_id, email, visitor_id, occurred_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.id)
        .bind(record.link_id)
        .bind(&record.email)
        .bind(&record.visitor_id)
        .bind(record.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err("Failed to append NDA acceptance"))?;
        Ok(())
    }

    async fn append_engagement(&self, record: &EngagementRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO engagement_events (id, link_id, email, action, page_number, seconds, \
             metadata, occurred_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(record.id)
        .bind(record.link_id)
        .bind(&record.email)
        .bind(record.action.as_str())
        .bind(record.page_number)
        .bind(record.seconds)
        .bind(&record.metadata)
        .bind(record.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err("Failed to append engagement event"))?;
        Ok(())
    }
}

/// Splits an outcome into its `outcome` and `denial_code` columns.
fn outcome_columns(outcome: &AccessOutcome) -> (&'static str, Option<String>) {
    match outcome {
        AccessOutcome::Granted => ("granted", None),
        AccessOutcome::RequiresCredentials => ("requires_credentials", None),
        AccessOutcome::Denied(code) => ("denied", Some(code.clone())),
    }
}
