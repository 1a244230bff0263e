//! Integration tests for the authentication, authorization, and feed
//! surfaces that do not require a live database.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use futures::StreamExt;
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::{build_test_app, token_for};

/// Collect a JSON response body.
async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.expect("body collects").to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = build_test_app();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn protected_route_requires_authentication() {
    let app = build_test_app();

    let response = app
        .oneshot(Request::get("/api/v1/readings").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_bearer_token_is_rejected() {
    let app = build_test_app();

    let response = app
        .oneshot(
            Request::get("/api/v1/readings")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_authorization_is_rejected() {
    let app = build_test_app();

    let response = app
        .oneshot(
            Request::get("/api/v1/readings")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn citizen_cannot_use_admin_stream_actions() {
    let app = build_test_app();

    let response = app
        .oneshot(
            Request::post("/api/v1/stream/admin")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for("citizen")))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"action":"status"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn citizen_cannot_transition_alert_status() {
    let app = build_test_app();

    let response = app
        .oneshot(
            Request::put("/api/v1/alerts/42/status")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for("citizen")))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"status":"resolved"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_outside_matrix_is_denied_by_access_guard() {
    let app = build_test_app();

    let response = app
        .oneshot(
            Request::get("/api/v1/readings")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for("intruder")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Feed endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_status_action_reports_loop_state() {
    let app = build_test_app();

    let response = app
        .oneshot(
            Request::post("/api/v1/stream/admin")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for("admin")))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"action":"status"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // No channel has connected, so the loop is idle at cursor 0.
    let json = body_json(response.into_body()).await;
    assert_eq!(json["data"]["connections"], 0);
    assert_eq!(json["data"]["cursor"], 0);
    assert_eq!(json["data"]["running"], false);
}

#[tokio::test]
async fn stream_opens_sse_channel_with_welcome_event() {
    let app = build_test_app();

    let response = app
        .oneshot(Request::get("/api/v1/stream").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    // The welcome event is queued at registration, so the first frame is
    // available immediately even though the reading store is unreachable
    // (the snapshot degrades to an empty array).
    let mut body = response.into_body().into_data_stream();
    let first = tokio::time::timeout(Duration::from_secs(5), body.next())
        .await
        .expect("first frame within timeout")
        .expect("stream not ended")
        .expect("frame read ok");

    let text = String::from_utf8(first.to_vec()).unwrap();
    assert!(text.starts_with("data: "), "unexpected frame: {text}");
    assert!(text.contains("\"type\":\"connection\""));
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();

    let response = app
        .oneshot(
            Request::get("/api/v1/suggestions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
