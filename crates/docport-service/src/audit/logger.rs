//! Best-effort audit appends over the link store.

use tracing::warn;

use docport_entity::audit::{
    AccessAttempt, EngagementRecord, NdaAcceptance, PasswordFailure,
};
use docport_store::{LinkStore, StoreManager};

/// Appends audit records and swallows every failure.
///
/// Audit is observability, not enforcement: a store hiccup on an append
/// must never change the outcome of the access decision it describes.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    /// The backing store.
    store: StoreManager,
}

impl AuditLogger {
    /// Creates a new audit logger.
    pub fn new(store: StoreManager) -> Self {
        Self { store }
    }

    /// Records an access evaluation, whatever its outcome.
    pub async fn access_attempt(&self, record: &AccessAttempt) {
        if let Err(e) = self.store.append_access_attempt(record).await {
            warn!(link_id = %record.link_id, error = %e, "Failed to append access attempt");
        }
    }

    /// Records a failed password attempt.
    pub async fn password_failure(&self, record: &PasswordFailure) {
        if let Err(e) = self.store.append_password_failure(record).await {
            warn!(link_id = %record.link_id, error = %e, "Failed to append password failure");
        }
    }

    /// Records an NDA acceptance.
    pub async fn nda_acceptance(&self, record: &NdaAcceptance) {
        if let Err(e) = self.store.append_nda_acceptance(record).await {
            warn!(link_id = %record.link_id, error = %e, "Failed to append NDA acceptance");
        }
    }

    /// Records a post-grant engagement event.
    pub async fn engagement(&self, record: &EngagementRecord) {
        if let Err(e) = self.store.append_engagement(record).await {
            warn!(link_id = %record.link_id, error = %e, "Failed to append engagement event");
        }
    }
}
