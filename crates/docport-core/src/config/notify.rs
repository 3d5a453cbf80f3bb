//! Notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Outbound notification configuration.
///
/// Notifications are fire-and-forget: a delivery failure never changes the
/// outcome of the access decision that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Whether notification dispatch is enabled at all.
    #[serde(default)]
    pub enabled: bool,
    /// Webhook endpoint that receives access events as JSON.
    #[serde(default)]
    pub webhook_url: String,
    /// Delivery timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
