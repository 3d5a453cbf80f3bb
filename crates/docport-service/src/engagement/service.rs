//! Engagement tracking behind a granted access token.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use docport_core::error::AppError;
use docport_core::events::AccessEvent;
use docport_core::result::AppResult;
use docport_entity::audit::{EngagementAction, EngagementRecord};
use docport_entity::token::AccessToken;
use docport_store::{LinkStore, StoreManager};

use crate::audit::AuditLogger;
use crate::notify::NotificationDispatcher;

/// Caller-supplied engagement report.
#[derive(Debug, Clone)]
pub struct EngagementInput {
    /// The bearer token minted at grant time.
    pub access_token: String,
    /// Wire form of the action (`page_view`, `download`, `time_spent`,
    /// `completed`).
    pub action: String,
    /// Page number for page-scoped events.
    pub page_number: Option<i32>,
    /// Reported dwell time in seconds.
    pub time_spent: Option<f64>,
    /// Free-form caller metadata.
    pub metadata: Option<serde_json::Value>,
}

/// Records post-grant engagement signals.
///
/// Every call is authorized by the bearer token alone; no gate re-run.
/// Expired tokens are pruned lazily when they show up here.
#[derive(Debug, Clone)]
pub struct EngagementService {
    /// The link store.
    store: StoreManager,
    /// Best-effort audit appends.
    audit: AuditLogger,
    /// Fire-and-forget access notifications.
    notifications: NotificationDispatcher,
}

impl EngagementService {
    /// Creates a new engagement service.
    pub fn new(
        store: StoreManager,
        audit: AuditLogger,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            audit,
            notifications,
        }
    }

    /// Records one engagement event against a link.
    pub async fn track(&self, link_id: Uuid, input: EngagementInput) -> AppResult<()> {
        let token = self.authorize(link_id, &input.access_token).await?;

        let action = EngagementAction::parse(&input.action).ok_or_else(|| {
            AppError::validation(format!("Unknown engagement action: '{}'", input.action))
        })?;

        match action {
            EngagementAction::PageView | EngagementAction::Completed => {}
            EngagementAction::Download => {
                let total_downloads = self.store.record_download(link_id).await?;
                if let Ok(Some(link)) = self.store.find_link(link_id).await {
                    if link.notify_on_access {
                        self.notifications.dispatch(AccessEvent::Downloaded {
                            link_id,
                            total_downloads,
                            occurred_at: Utc::now(),
                        });
                    }
                }
            }
            EngagementAction::TimeSpent => {
                let seconds = input.time_spent.ok_or_else(|| {
                    AppError::validation("timeSpent is required for time_spent events")
                })?;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(AppError::validation("timeSpent must be a non-negative number"));
                }
                self.store.record_view_time(link_id, seconds).await?;
            }
        }

        self.audit
            .engagement(&EngagementRecord {
                id: Uuid::new_v4(),
                link_id,
                email: token.email.clone(),
                action,
                page_number: input.page_number,
                seconds: input.time_spent,
                metadata: input.metadata.unwrap_or(serde_json::Value::Null),
                occurred_at: Utc::now(),
            })
            .await;

        Ok(())
    }

    /// Resolves and validates the bearer token for `link_id`.
    ///
    /// Absent, expired, and wrong-link tokens all produce the same
    /// authentication error. Expired tokens are deleted on sight.
    async fn authorize(&self, link_id: Uuid, value: &str) -> AppResult<AccessToken> {
        let invalid = || AppError::authentication("Invalid or expired access token");

        let Some(token) = self.store.find_token(value).await? else {
            return Err(invalid());
        };

        let now = Utc::now();
        if token.is_expired(now) {
            if let Err(e) = self.store.delete_token(value).await {
                warn!(error = %e, "Failed to prune expired token");
            }
            return Err(invalid());
        }
        if !token.is_valid_for(link_id, now) {
            return Err(invalid());
        }

        Ok(token)
    }
}
