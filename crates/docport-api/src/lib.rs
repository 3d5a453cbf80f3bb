//! # docport-api
//!
//! HTTP API layer for the DocPort gateway built on Axum.
//!
//! Provides the link access endpoints, engagement tracking, health check,
//! request metadata extraction, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
