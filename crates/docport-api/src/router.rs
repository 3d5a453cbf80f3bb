//! Route definitions for the DocPort HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to every handler via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(link_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Link access and engagement endpoints.
fn link_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/links/{link_id}/access",
            get(handlers::access::evaluate_access).post(handlers::access::authenticate_access),
        )
        .route(
            "/links/{link_id}/engagement",
            patch(handlers::engagement::track_engagement),
        )
}

/// Health check endpoint.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
