//! Application builder — wires services, router, and state into an Axum
//! app.

use std::sync::Arc;

use axum::Router;

use docport_auth::gate::PolicyEvaluator;
use docport_auth::password::PasswordHasher;
use docport_auth::token::TokenIssuer;
use docport_core::config::AppConfig;
use docport_core::error::AppError;
use docport_core::result::AppResult;
use docport_core::traits::captcha::PresenceVerifier;
use docport_service::{AccessService, AuditLogger, EngagementService, NotificationDispatcher};
use docport_store::StoreManager;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the application state: store, gate chain, services.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    let store = StoreManager::new(&config.store).await?;
    build_state_with_store(config, store)
}

/// Builds the application state over an existing store.
///
/// Integration tests use this to run the full HTTP surface against the
/// in-memory backend.
pub fn build_state_with_store(config: AppConfig, store: StoreManager) -> AppResult<AppState> {
    let notifications = NotificationDispatcher::from_config(&config.notify)?;
    let audit = AuditLogger::new(store.clone());

    let access_service = Arc::new(AccessService::new(
        store.clone(),
        PolicyEvaluator::new(PasswordHasher::new()),
        TokenIssuer::new(&config.auth),
        Arc::new(PresenceVerifier),
        audit.clone(),
        notifications.clone(),
    ));

    let engagement_service = Arc::new(EngagementService::new(
        store.clone(),
        audit,
        notifications,
    ));

    Ok(AppState {
        config: Arc::new(config),
        store,
        access_service,
        engagement_service,
    })
}

/// Builds the complete Axum application from state.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the gateway server until ctrl-c.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = build_state(config).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("DocPort gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
