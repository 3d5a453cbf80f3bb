//! In-memory link store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use docport_core::error::AppError;
use docport_core::result::AppResult;
use docport_entity::audit::{AccessAttempt, EngagementRecord, NdaAcceptance, PasswordFailure};
use docport_entity::document::DocumentRef;
use docport_entity::link::ShareLink;
use docport_entity::token::AccessToken;
use docport_entity::visitor::Visit;

use crate::store::{LinkStore, ViewOutcome};

/// Internal state for the memory-based link store.
#[derive(Debug, Default)]
struct InnerState {
    /// Links keyed by ID.
    links: HashMap<Uuid, ShareLink>,
    /// Documents keyed by ID.
    documents: HashMap<Uuid, DocumentRef>,
    /// Access tokens keyed by token value.
    tokens: HashMap<String, AccessToken>,
    /// Append-only access attempt stream.
    access_attempts: Vec<AccessAttempt>,
    /// Append-only failed password stream.
    password_failures: Vec<PasswordFailure>,
    /// Append-only NDA acceptance stream.
    nda_acceptances: Vec<NdaAcceptance>,
    /// Append-only engagement stream.
    engagements: Vec<EngagementRecord>,
}

/// In-memory link store using a Tokio mutex for thread safety.
///
/// Every operation runs inside a single critical section, so the
/// check-and-increment of [`LinkStore::record_view`] cannot interleave
/// with a concurrent writer. Suitable for single-node deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemoryLinkStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryLinkStore {
    /// Creates a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the access attempt stream (for tests and reporting).
    pub async fn access_attempts(&self) -> Vec<AccessAttempt> {
        self.state.lock().await.access_attempts.clone()
    }

    /// Snapshot of the failed password stream (for tests and reporting).
    pub async fn password_failures(&self) -> Vec<PasswordFailure> {
        self.state.lock().await.password_failures.clone()
    }

    /// Snapshot of the NDA acceptance stream (for tests and reporting).
    pub async fn nda_acceptances(&self) -> Vec<NdaAcceptance> {
        self.state.lock().await.nda_acceptances.clone()
    }

    /// Snapshot of the engagement stream (for tests and reporting).
    pub async fn engagements(&self) -> Vec<EngagementRecord> {
        self.state.lock().await.engagements.clone()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn find_link(&self, link_id: Uuid) -> AppResult<Option<ShareLink>> {
        Ok(self.state.lock().await.links.get(&link_id).cloned())
    }

    async fn put_link(&self, link: &ShareLink) -> AppResult<()> {
        self.state.lock().await.links.insert(link.id, link.clone());
        Ok(())
    }

    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<DocumentRef>> {
        Ok(self.state.lock().await.documents.get(&document_id).cloned())
    }

    async fn put_document(&self, document: &DocumentRef) -> AppResult<()> {
        self.state
            .lock()
            .await
            .documents
            .insert(document.id, document.clone());
        Ok(())
    }

    async fn record_view(&self, link_id: Uuid, visit: &Visit) -> AppResult<ViewOutcome> {
        let mut state = self.state.lock().await;
        let link = state
            .links
            .get_mut(&link_id)
            .ok_or_else(|| AppError::not_found("Link not found"))?;

        if link.quota_exhausted() {
            return Ok(ViewOutcome::LimitReached);
        }

        link.access_count += 1;
        link.analytics.last_accessed = Some(Utc::now());

        let analytics = &mut link.analytics;
        if !analytics
            .unique_visitors
            .iter()
            .any(|v| v == &visit.visitor_id)
        {
            analytics.unique_visitors.push(visit.visitor_id.clone());
        }
        *analytics
            .views_by_country
            .entry(visit.country.clone())
            .or_insert(0) += 1;
        *analytics
            .views_by_device
            .entry(visit.device.as_str().to_string())
            .or_insert(0) += 1;

        Ok(ViewOutcome::Recorded {
            access_count: link.access_count,
        })
    }

    async fn record_download(&self, link_id: Uuid) -> AppResult<i64> {
        let mut state = self.state.lock().await;
        let link = state
            .links
            .get_mut(&link_id)
            .ok_or_else(|| AppError::not_found("Link not found"))?;

        link.analytics.total_downloads += 1;
        Ok(link.analytics.total_downloads)
    }

    async fn record_view_time(&self, link_id: Uuid, seconds: f64) -> AppResult<f64> {
        let mut state = self.state.lock().await;
        let link = state
            .links
            .get_mut(&link_id)
            .ok_or_else(|| AppError::not_found("Link not found"))?;

        // Incremental mean with access_count as the implicit sample count.
        let count = link.access_count as f64;
        let current = link.analytics.average_view_time_seconds;
        link.analytics.average_view_time_seconds =
            ((current * count + seconds) / (count + 1.0)).round();
        Ok(link.analytics.average_view_time_seconds)
    }

    async fn insert_token(&self, token: &AccessToken) -> AppResult<()> {
        self.state
            .lock()
            .await
            .tokens
            .insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_token(&self, value: &str) -> AppResult<Option<AccessToken>> {
        Ok(self.state.lock().await.tokens.get(value).cloned())
    }

    async fn delete_token(&self, value: &str) -> AppResult<bool> {
        Ok(self.state.lock().await.tokens.remove(value).is_some())
    }

    async fn append_access_attempt(&self, record: &AccessAttempt) -> AppResult<()> {
        self.state.lock().await.access_attempts.push(record.clone());
        Ok(())
    }

    async fn append_password_failure(&self, record: &PasswordFailure) -> AppResult<()> {
        self.state
            .lock()
            .await
            .password_failures
            .push(record.clone());
        Ok(())
    }

    async fn append_nda_acceptance(&self, record: &NdaAcceptance) -> AppResult<()> {
        self.state.lock().await.nda_acceptances.push(record.clone());
        Ok(())
    }

    async fn append_engagement(&self, record: &EngagementRecord) -> AppResult<()> {
        self.state.lock().await.engagements.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use docport_entity::visitor::DeviceClass;

    use super::*;

    fn visit(visitor_id: &str) -> Visit {
        Visit {
            visitor_id: visitor_id.to_string(),
            country: "DE".to_string(),
            device: DeviceClass::Desktop,
        }
    }

    async fn seeded_link(store: &MemoryLinkStore, max: Option<i64>) -> Uuid {
        let mut link = ShareLink::new(Uuid::new_v4());
        link.max_access_count = max;
        store.put_link(&link).await.unwrap();
        link.id
    }

    #[tokio::test]
    async fn bounded_increment_never_exceeds_quota_under_concurrency() {
        let store = MemoryLinkStore::new();
        let link_id = seeded_link(&store, Some(10)).await;

        let mut handles = Vec::new();
        for i in 0..15 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.record_view(link_id, &visit(&format!("v{i}"))).await
            }));
        }

        let mut granted = 0;
        let mut limited = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                ViewOutcome::Recorded { .. } => granted += 1,
                ViewOutcome::LimitReached => limited += 1,
            }
        }

        assert_eq!(granted, 10);
        assert_eq!(limited, 5);

        let link = store.find_link(link_id).await.unwrap().unwrap();
        assert_eq!(link.access_count, 10);
    }

    #[tokio::test]
    async fn repeat_visitor_counts_views_but_not_uniques() {
        let store = MemoryLinkStore::new();
        let link_id = seeded_link(&store, None).await;

        store.record_view(link_id, &visit("same")).await.unwrap();
        store.record_view(link_id, &visit("same")).await.unwrap();

        let link = store.find_link(link_id).await.unwrap().unwrap();
        assert_eq!(link.access_count, 2);
        assert_eq!(link.analytics.unique_visitor_count(), 1);
        assert_eq!(link.analytics.views_by_country.get("DE"), Some(&2));
        assert_eq!(link.analytics.views_by_device.get("desktop"), Some(&2));
    }

    #[tokio::test]
    async fn running_average_matches_incremental_mean() {
        let store = MemoryLinkStore::new();
        let link_id = seeded_link(&store, None).await;

        store.record_view(link_id, &visit("v1")).await.unwrap();
        let avg = store.record_view_time(link_id, 40.0).await.unwrap();
        assert_eq!(avg, 20.0);

        store.record_view(link_id, &visit("v2")).await.unwrap();
        let avg = store.record_view_time(link_id, 20.0).await.unwrap();
        assert_eq!(avg, 20.0);
    }

    #[tokio::test]
    async fn download_counter_increments() {
        let store = MemoryLinkStore::new();
        let link_id = seeded_link(&store, None).await;

        assert_eq!(store.record_download(link_id).await.unwrap(), 1);
        assert_eq!(store.record_download(link_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn view_on_missing_link_is_not_found() {
        let store = MemoryLinkStore::new();
        let err = store
            .record_view(Uuid::new_v4(), &visit("v"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, docport_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn tokens_round_trip_and_delete() {
        let store = MemoryLinkStore::new();
        let link = ShareLink::new(Uuid::new_v4());
        let token = AccessToken {
            token: "abc".into(),
            link_id: link.id,
            document_id: link.document_id,
            email: None,
            permissions: link.permissions,
            created_at: Utc::now(),
            expires_at: Utc::now(),
        };

        store.insert_token(&token).await.unwrap();
        assert!(store.find_token("abc").await.unwrap().is_some());
        assert!(store.delete_token("abc").await.unwrap());
        assert!(store.find_token("abc").await.unwrap().is_none());
        assert!(!store.delete_token("abc").await.unwrap());
    }
}
