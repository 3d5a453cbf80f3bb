//! Access token and credential configuration.

use serde::{Deserialize, Serialize};

/// Authorization and token issuance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access token TTL in hours, fixed at issuance (not sliding).
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl(),
        }
    }
}

fn default_token_ttl() -> u64 {
    24
}
