//! Link access handlers: the no-credential probe and the credentialed
//! grant.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use docport_service::access::AccessEvaluation;

use crate::dto::request::AccessRequest;
use crate::dto::response::{AccessGrantedResponse, RequirementsResponse};
use crate::error::{ApiError, denial_response};
use crate::extractors::RequestMeta;
use crate::state::AppState;

/// GET /api/links/{link_id}/access
pub async fn evaluate_access(
    State(state): State<AppState>,
    Path(link_id): Path<Uuid>,
    meta: RequestMeta,
) -> Result<Response, ApiError> {
    let ctx = meta.into_context();

    let response = match state.access_service.evaluate(link_id, &ctx).await? {
        AccessEvaluation::NeedsCredentials(req) => {
            Json(RequirementsResponse::new(req)).into_response()
        }
        AccessEvaluation::Granted(granted) => {
            Json(AccessGrantedResponse::for_view(*granted)).into_response()
        }
        AccessEvaluation::Denied(code) => denial_response(code),
    };

    Ok(response)
}

/// POST /api/links/{link_id}/access
pub async fn authenticate_access(
    State(state): State<AppState>,
    Path(link_id): Path<Uuid>,
    meta: RequestMeta,
    Json(req): Json<AccessRequest>,
) -> Result<Response, ApiError> {
    let ctx = meta.into_context();
    let credentials = req.into();

    let response = match state
        .access_service
        .authenticate(link_id, &credentials, &ctx)
        .await?
    {
        AccessEvaluation::NeedsCredentials(req) => {
            Json(RequirementsResponse::new(req)).into_response()
        }
        AccessEvaluation::Granted(granted) => {
            Json(AccessGrantedResponse::for_session(*granted)).into_response()
        }
        AccessEvaluation::Denied(code) => denial_response(code),
    };

    Ok(response)
}
