//! Notification delivery trait for pluggable backends.

use async_trait::async_trait;

use crate::events::AccessEvent;
use crate::result::AppResult;

/// Trait for notification backends (webhook, noop).
///
/// Deliveries are fire-and-forget with respect to access decisions: the
/// dispatcher logs failures and never propagates them to the caller.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a single access event.
    async fn notify(&self, event: &AccessEvent) -> AppResult<()>;
}
