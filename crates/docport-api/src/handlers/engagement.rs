//! Engagement tracking handler.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::dto::request::EngagementRequest;
use crate::dto::response::TrackedResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// PATCH /api/links/{link_id}/engagement
pub async fn track_engagement(
    State(state): State<AppState>,
    Path(link_id): Path<Uuid>,
    Json(req): Json<EngagementRequest>,
) -> Result<Json<TrackedResponse>, ApiError> {
    state
        .engagement_service
        .track(link_id, req.into())
        .await?;

    Ok(Json(TrackedResponse { success: true }))
}
