//! Schema bootstrap for the PostgreSQL backend.
//!
//! Tables are created on startup if missing. Audit tables are append-only
//! by convention: the store exposes no update or delete paths for them.

use sqlx::PgPool;
use tracing::info;

use docport_core::error::{AppError, ErrorKind};
use docport_core::result::AppResult;

const TABLES: [&str; 7] = [
    r#"CREATE TABLE IF NOT EXISTS documents (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        content_type TEXT NOT NULL,
        page_count INTEGER,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS share_links (
        id UUID PRIMARY KEY,
        document_id UUID NOT NULL,
        disabled BOOLEAN NOT NULL DEFAULT FALSE,
        expires_at TIMESTAMPTZ,
        max_access_count BIGINT,
        access_count BIGINT NOT NULL DEFAULT 0,
        require_email BOOLEAN NOT NULL DEFAULT FALSE,
        require_password BOOLEAN NOT NULL DEFAULT FALSE,
        password_hash TEXT,
        require_nda BOOLEAN NOT NULL DEFAULT FALSE,
        nda_text TEXT,
        require_captcha BOOLEAN NOT NULL DEFAULT FALSE,
        allowed_emails TEXT[] NOT NULL DEFAULT '{}',
        blocked_emails TEXT[] NOT NULL DEFAULT '{}',
        allowed_domains TEXT[] NOT NULL DEFAULT '{}',
        permissions JSONB NOT NULL,
        watermark_enabled BOOLEAN NOT NULL DEFAULT FALSE,
        disable_forwarding BOOLEAN NOT NULL DEFAULT FALSE,
        custom_message TEXT,
        redirect_url TEXT,
        notify_on_access BOOLEAN NOT NULL DEFAULT FALSE,
        unique_visitors TEXT[] NOT NULL DEFAULT '{}',
        views_by_country JSONB NOT NULL DEFAULT '{}',
        views_by_device JSONB NOT NULL DEFAULT '{}',
        average_view_time_seconds DOUBLE PRECISION NOT NULL DEFAULT 0,
        total_downloads BIGINT NOT NULL DEFAULT 0,
        last_accessed TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS access_tokens (
        token TEXT PRIMARY KEY,
        link_id UUID NOT NULL,
        document_id UUID NOT NULL,
        email TEXT,
        permissions JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        expires_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS access_attempts (
        id UUID PRIMARY KEY,
        link_id UUID NOT NULL,
        document_id UUID NOT NULL,
        visitor_id TEXT NOT NULL,
        email TEXT,
        country TEXT NOT NULL,
        device TEXT NOT NULL,
        user_agent TEXT,
        referrer TEXT,
        action TEXT NOT NULL,
        outcome TEXT NOT NULL,
        denial_code TEXT,
        occurred_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS password_failures (
        id UUID PRIMARY KEY,
        link_id UUID NOT NULL,
        email TEXT,
        visitor_id TEXT NOT NULL,
        occurred_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS nda_acceptances (
        id UUID PRIMARY KEY,
        link_id UUID NOT NULL,
        email TEXT,
        visitor_id TEXT NOT NULL,
        occurred_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS engagement_events (
        id UUID PRIMARY KEY,
        link_id UUID NOT NULL,
        email TEXT,
        action TEXT NOT NULL,
        page_number INTEGER,
        seconds DOUBLE PRECISION,
        metadata JSONB NOT NULL DEFAULT '{}',
        occurred_at TIMESTAMPTZ NOT NULL
    )"#,
];

/// Create all gateway tables if they do not exist yet.
pub async fn bootstrap(pool: &PgPool) -> AppResult<()> {
    for ddl in TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Schema bootstrap failed", e))?;
    }
    info!("Link store schema is up to date");
    Ok(())
}
