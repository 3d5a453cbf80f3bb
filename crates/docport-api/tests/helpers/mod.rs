//! Shared test helpers for integration tests.
//!
//! The full HTTP surface runs against the in-memory store, so tests can
//! inspect counters and audit streams directly.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use docport_api::app::build_state_with_store;
use docport_api::build_app;
use docport_core::config::AppConfig;
use docport_entity::document::DocumentRef;
use docport_entity::link::ShareLink;
use docport_store::memory::MemoryLinkStore;
use docport_store::{LinkStore, StoreManager};

/// A visitor Chrome desktop user agent.
pub const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0";

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Direct handle on the in-memory store.
    pub store: MemoryLinkStore,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store.
    pub fn new() -> Self {
        let store = MemoryLinkStore::new();
        let manager = StoreManager::from_provider(Arc::new(store.clone()));
        let state = build_state_with_store(AppConfig::default(), manager)
            .expect("Failed to build test state");

        Self {
            router: build_app(state),
            store,
        }
    }

    /// Seed a link together with a backing document.
    pub async fn seed_link(&self, link: &ShareLink) {
        let mut document = DocumentRef::new("quarterly-report.pdf", "application/pdf");
        document.id = link.document_id;
        self.store
            .put_document(&document)
            .await
            .expect("Failed to seed document");
        self.store.put_link(link).await.expect("Failed to seed link");
    }

    /// Seed an open link (no credential factors) and return it.
    pub async fn seed_open_link(&self) -> ShareLink {
        let link = ShareLink::new(Uuid::new_v4());
        self.seed_link(&link).await;
        link
    }

    /// Make a request with the default visitor headers.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        self.request_as(method, path, body, "203.0.113.7", DESKTOP_UA)
            .await
    }

    /// Make a request as a specific visitor (IP + user agent).
    pub async fn request_as(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        ip: &str,
        user_agent: &str,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("x-forwarded-for", ip)
            .header("user-agent", user_agent)
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}

impl TestResponse {
    /// The `code` field of an error body.
    pub fn code(&self) -> &str {
        self.body.get("code").and_then(|v| v.as_str()).unwrap_or("")
    }
}
