//! Liveness, readiness and observability plumbing.

use super::{build_test_router, get_json, TestAppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

#[tokio::test]
async fn test_health() {
    let app = build_test_router(TestAppState::new());

    let (status, body) = get_json(&app, "/health", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_reports_service() {
    let app = build_test_router(TestAppState::new());

    let (status, body) = get_json(&app, "/", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "yachtcash-core");
}

#[tokio::test]
async fn test_ready() {
    let app = build_test_router(TestAppState::new());

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_disabled() {
    let app = build_test_router(TestAppState::new());

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = build_test_router(TestAppState::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-123"
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = build_test_router(TestAppState::new());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
