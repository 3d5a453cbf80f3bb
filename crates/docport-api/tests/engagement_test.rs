//! Integration tests for the engagement tracking endpoint.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

use docport_entity::link::ShareLink;
use docport_entity::token::AccessToken;
use docport_store::LinkStore;

use helpers::TestApp;

/// Grants a session on an open link and returns the minted token value.
async fn grant_session(app: &TestApp, link: &ShareLink) -> String {
    let response = app
        .request(
            "POST",
            &format!("/api/links/{}/access", link.id),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["accessToken"].as_str().unwrap().to_string()
}

fn engagement_path(link: &ShareLink) -> String {
    format!("/api/links/{}/engagement", link.id)
}

#[tokio::test]
async fn page_view_is_recorded() {
    let app = TestApp::new();
    let link = app.seed_open_link().await;
    let token = grant_session(&app, &link).await;

    let response = app
        .request(
            "PATCH",
            &engagement_path(&link),
            Some(json!({
                "accessToken": token,
                "action": "page_view",
                "pageNumber": 3,
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], json!(true));

    let events = app.store.engagements().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].page_number, Some(3));
}

#[tokio::test]
async fn download_bumps_the_counter() {
    let app = TestApp::new();
    let link = app.seed_open_link().await;
    let token = grant_session(&app, &link).await;

    let response = app
        .request(
            "PATCH",
            &engagement_path(&link),
            Some(json!({ "accessToken": token, "action": "download" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let stored = app.store.find_link(link.id).await.unwrap().unwrap();
    assert_eq!(stored.analytics.total_downloads, 1);
}

#[tokio::test]
async fn time_spent_folds_into_the_running_average() {
    let app = TestApp::new();
    let link = app.seed_open_link().await;
    let token = grant_session(&app, &link).await;

    // One grant so far: avg = round((0*1 + 40) / 2) = 20.
    app.request(
        "PATCH",
        &engagement_path(&link),
        Some(json!({ "accessToken": token, "action": "time_spent", "timeSpent": 40.0 })),
    )
    .await;
    let stored = app.store.find_link(link.id).await.unwrap().unwrap();
    assert_eq!(stored.analytics.average_view_time_seconds, 20.0);

    // avg = round((20*1 + 20) / 2) = 20.
    app.request(
        "PATCH",
        &engagement_path(&link),
        Some(json!({ "accessToken": token, "action": "time_spent", "timeSpent": 20.0 })),
    )
    .await;
    let stored = app.store.find_link(link.id).await.unwrap().unwrap();
    assert_eq!(stored.analytics.average_view_time_seconds, 20.0);
}

#[tokio::test]
async fn missing_time_spent_value_is_a_bad_request() {
    let app = TestApp::new();
    let link = app.seed_open_link().await;
    let token = grant_session(&app, &link).await;

    let response = app
        .request(
            "PATCH",
            &engagement_path(&link),
            Some(json!({ "accessToken": token, "action": "time_spent" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_action_is_a_bad_request() {
    let app = TestApp::new();
    let link = app.seed_open_link().await;
    let token = grant_session(&app, &link).await;

    let response = app
        .request(
            "PATCH",
            &engagement_path(&link),
            Some(json!({ "accessToken": token, "action": "print" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.engagements().await.is_empty());
}

#[tokio::test]
async fn bogus_token_is_unauthorized() {
    let app = TestApp::new();
    let link = app.seed_open_link().await;

    let response = app
        .request(
            "PATCH",
            &engagement_path(&link),
            Some(json!({ "accessToken": "f".repeat(64), "action": "page_view" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_scoped_to_another_link_is_unauthorized() {
    let app = TestApp::new();
    let link = app.seed_open_link().await;
    let other = app.seed_open_link().await;
    let other_token = grant_session(&app, &other).await;

    let response = app
        .request(
            "PATCH",
            &engagement_path(&link),
            Some(json!({ "accessToken": other_token, "action": "page_view" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized_and_pruned() {
    let app = TestApp::new();
    let link = app.seed_open_link().await;

    let now = Utc::now();
    let expired = AccessToken {
        token: "e".repeat(64),
        link_id: link.id,
        document_id: link.document_id,
        email: None,
        permissions: link.permissions,
        created_at: now - Duration::hours(48),
        expires_at: now - Duration::hours(24),
    };
    app.store.insert_token(&expired).await.unwrap();

    let response = app
        .request(
            "PATCH",
            &engagement_path(&link),
            Some(json!({ "accessToken": expired.token, "action": "page_view" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.store.find_token(&expired.token).await.unwrap().is_none());
}
