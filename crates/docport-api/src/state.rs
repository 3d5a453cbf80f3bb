//! Application state shared across all handlers.

use std::sync::Arc;

use docport_core::config::AppConfig;
use docport_service::{AccessService, EngagementService};
use docport_store::StoreManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Link store (memory or PostgreSQL).
    pub store: StoreManager,
    /// Access evaluation and authentication service.
    pub access_service: Arc<AccessService>,
    /// Engagement tracking service.
    pub engagement_service: Arc<EngagementService>,
}
