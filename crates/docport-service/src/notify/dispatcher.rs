//! Notification dispatch decoupled from the request path.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use docport_core::config::notify::NotifyConfig;
use docport_core::events::AccessEvent;
use docport_core::result::AppResult;
use docport_core::traits::Notifier;

use super::webhook::WebhookNotifier;

/// Notifier that drops every event. Used when dispatch is disabled.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _event: &AccessEvent) -> AppResult<()> {
        Ok(())
    }
}

/// Hands access events to the configured notifier on a spawned task.
///
/// Dispatch never blocks the request and never fails it: delivery errors
/// are logged and dropped.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    /// The delivery backend.
    notifier: Arc<dyn Notifier>,
    /// Whether dispatch is enabled at all.
    enabled: bool,
}

impl NotificationDispatcher {
    /// Builds a dispatcher from notification configuration.
    ///
    /// Disabled config (or a blank webhook URL) selects the noop backend.
    pub fn from_config(config: &NotifyConfig) -> AppResult<Self> {
        if config.enabled && !config.webhook_url.trim().is_empty() {
            Ok(Self::new(Arc::new(WebhookNotifier::new(config)?)))
        } else {
            Ok(Self::disabled())
        }
    }

    /// Creates an enabled dispatcher over a notifier backend.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            enabled: true,
        }
    }

    /// Creates a dispatcher that drops every event.
    pub fn disabled() -> Self {
        Self {
            notifier: Arc::new(NoopNotifier),
            enabled: false,
        }
    }

    /// Dispatches one event without waiting for delivery.
    pub fn dispatch(&self, event: AccessEvent) {
        if !self.enabled {
            return;
        }
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match notifier.notify(&event).await {
                Ok(()) => debug!(?event, "Access event delivered"),
                Err(e) => warn!(error = %e, "Failed to deliver access event"),
            }
        });
    }
}
