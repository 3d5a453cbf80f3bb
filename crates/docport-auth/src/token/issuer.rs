//! Mints short-lived bearer tokens for granted sessions.

use chrono::{Duration, Utc};
use rand::RngCore;

use docport_core::config::auth::AuthConfig;
use docport_entity::link::ShareLink;
use docport_entity::token::AccessToken;

/// Issues access tokens bound to a link grant.
///
/// Tokens carry a snapshot of the link's permission set taken at issuance.
/// The TTL is fixed when the token is minted and never slides; a new
/// session requires a fresh pass through the gate chain.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    /// Token lifetime in hours.
    ttl_hours: i64,
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            ttl_hours: config.token_ttl_hours as i64,
        }
    }

    /// Mints a token for a granted session on `link`.
    pub fn issue(&self, link: &ShareLink, email: Option<String>) -> AccessToken {
        let now = Utc::now();
        AccessToken {
            token: generate_token_value(),
            link_id: link.id,
            document_id: link.document_id,
            email,
            permissions: link.permissions,
            created_at: now,
            expires_at: now + Duration::hours(self.ttl_hours),
        }
    }
}

/// Generates a cryptographically random 64-character hex token value.
fn generate_token_value() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
