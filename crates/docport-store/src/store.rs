//! The `LinkStore` trait and the provider-dispatching manager.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use docport_core::config::store::StoreConfig;
use docport_core::error::AppError;
use docport_core::result::AppResult;
use docport_entity::audit::{AccessAttempt, EngagementRecord, NdaAcceptance, PasswordFailure};
use docport_entity::document::DocumentRef;
use docport_entity::link::ShareLink;
use docport_entity::token::AccessToken;
use docport_entity::visitor::Visit;

/// Result of the atomic bounded view increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The view was recorded; `access_count` is the value after the
    /// increment.
    Recorded {
        /// Access count after this grant.
        access_count: i64,
    },
    /// The conditional update declined: recording the view would have
    /// pushed `access_count` past `max_access_count`. Nothing was mutated.
    LimitReached,
}

/// Trait for Link Store backends (in-memory, PostgreSQL).
///
/// The quota invariant lives here: [`LinkStore::record_view`] combines the
/// `access_count < max_access_count` check with the increment and the
/// analytics merge in one atomic operation, so concurrent grants can never
/// over-consume a bounded link. Audit appends are write-once and safe to
/// duplicate on retry.
#[async_trait]
pub trait LinkStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a share link by ID.
    async fn find_link(&self, link_id: Uuid) -> AppResult<Option<ShareLink>>;

    /// Insert or replace a share link (owner-side seeding).
    async fn put_link(&self, link: &ShareLink) -> AppResult<()>;

    /// Find a document reference by ID.
    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<DocumentRef>>;

    /// Insert or replace a document reference.
    async fn put_document(&self, document: &DocumentRef) -> AppResult<()>;

    /// Atomically record a granted view: check the quota, increment
    /// `access_count`, set `last_accessed`, insert the visitor into the
    /// unique set iff absent, and bump the country and device counters.
    async fn record_view(&self, link_id: Uuid, visit: &Visit) -> AppResult<ViewOutcome>;

    /// Atomically increment the download counter. Returns the new total.
    async fn record_download(&self, link_id: Uuid) -> AppResult<i64>;

    /// Atomically fold a dwell-time sample into the running average using
    /// the link's current access count as the implicit sample count.
    /// Returns the new average.
    async fn record_view_time(&self, link_id: Uuid, seconds: f64) -> AppResult<f64>;

    /// Persist an issued access token.
    async fn insert_token(&self, token: &AccessToken) -> AppResult<()>;

    /// Find an access token by its value. Expired tokens are returned as
    /// stored; callers prune them lazily via [`LinkStore::delete_token`].
    async fn find_token(&self, value: &str) -> AppResult<Option<AccessToken>>;

    /// Delete an access token. Returns whether a token was removed.
    async fn delete_token(&self, value: &str) -> AppResult<bool>;

    /// Append an access attempt record.
    async fn append_access_attempt(&self, record: &AccessAttempt) -> AppResult<()>;

    /// Append a failed password attempt record.
    async fn append_password_failure(&self, record: &PasswordFailure) -> AppResult<()>;

    /// Append an NDA acceptance record.
    async fn append_nda_acceptance(&self, record: &NdaAcceptance) -> AppResult<()>;

    /// Append an engagement event record.
    async fn append_engagement(&self, record: &EngagementRecord) -> AppResult<()>;
}

/// Store manager that wraps the configured backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store backend.
    inner: Arc<dyn LinkStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn LinkStore> = match config.provider.as_str() {
            "memory" => {
                info!("Initializing in-memory link store");
                Arc::new(crate::memory::MemoryLinkStore::new())
            }
            "postgres" => {
                info!("Initializing PostgreSQL link store");
                let pool = crate::postgres::connection::create_pool(&config.postgres).await?;
                crate::postgres::schema::bootstrap(&pool).await?;
                Arc::new(crate::postgres::PostgresLinkStore::new(pool))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_provider(provider: Arc<dyn LinkStore>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl LinkStore for StoreManager {
    async fn find_link(&self, link_id: Uuid) -> AppResult<Option<ShareLink>> {
        self.inner.find_link(link_id).await
    }

    async fn put_link(&self, link: &ShareLink) -> AppResult<()> {
        self.inner.put_link(link).await
    }

    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<DocumentRef>> {
        self.inner.find_document(document_id).await
    }

    async fn put_document(&self, document: &DocumentRef) -> AppResult<()> {
        self.inner.put_document(document).await
    }

    async fn record_view(&self, link_id: Uuid, visit: &Visit) -> AppResult<ViewOutcome> {
        self.inner.record_view(link_id, visit).await
    }

    async fn record_download(&self, link_id: Uuid) -> AppResult<i64> {
        self.inner.record_download(link_id).await
    }

    async fn record_view_time(&self, link_id: Uuid, seconds: f64) -> AppResult<f64> {
        self.inner.record_view_time(link_id, seconds).await
    }

    async fn insert_token(&self, token: &AccessToken) -> AppResult<()> {
        self.inner.insert_token(token).await
    }

    async fn find_token(&self, value: &str) -> AppResult<Option<AccessToken>> {
        self.inner.find_token(value).await
    }

    async fn delete_token(&self, value: &str) -> AppResult<bool> {
        self.inner.delete_token(value).await
    }

    async fn append_access_attempt(&self, record: &AccessAttempt) -> AppResult<()> {
        self.inner.append_access_attempt(record).await
    }

    async fn append_password_failure(&self, record: &PasswordFailure) -> AppResult<()> {
        self.inner.append_password_failure(record).await
    }

    async fn append_nda_acceptance(&self, record: &NdaAcceptance) -> AppResult<()> {
        self.inner.append_nda_acceptance(record).await
    }

    async fn append_engagement(&self, record: &EngagementRecord) -> AppResult<()> {
        self.inner.append_engagement(record).await
    }
}
