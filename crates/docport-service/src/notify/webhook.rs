//! Webhook notification backend.

use std::time::Duration;

use async_trait::async_trait;

use docport_core::config::notify::NotifyConfig;
use docport_core::error::AppError;
use docport_core::events::AccessEvent;
use docport_core::result::AppResult;
use docport_core::traits::Notifier;

/// Delivers access events as JSON POSTs to a configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    /// HTTP client with the configured delivery timeout.
    client: reqwest::Client,
    /// Webhook endpoint.
    url: String,
}

impl WebhookNotifier {
    /// Creates a webhook notifier from notification configuration.
    pub fn new(config: &NotifyConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    docport_core::error::ErrorKind::Configuration,
                    "Failed to build webhook HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &AccessEvent) -> AppResult<()> {
        self.client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                AppError::with_source(
                    docport_core::error::ErrorKind::ExternalService,
                    "Webhook delivery failed",
                    e,
                )
            })?;
        Ok(())
    }
}
