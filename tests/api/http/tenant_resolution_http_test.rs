//! Tenant resolution through the middleware, observed via
//! `GET /api/tenant/current`.

use super::{build_test_router, get_json, TestAppState};
use crate::api::create_test_tenant;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use yachtcash_core::domain::StringUuid;

#[tokio::test]
async fn test_header_resolves_tenant_without_lookup() {
    let state = TestAppState::new();
    let tenant = create_test_tenant("acme");
    let tenant_id = tenant.id.to_string();
    state.tenant_repo.add_tenant(tenant).await;
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);

    let (status, body) = get_json(
        &app,
        "/api/tenant/current",
        &[("x-tenant-id", tenant_id.as_str()), ("host", "api.example.com")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], tenant_id.as_str());
    assert_eq!(tenant_repo.subdomain_lookups(), 0);
}

#[tokio::test]
async fn test_subdomain_resolves_tenant() {
    let state = TestAppState::new();
    let tenant = create_test_tenant("acme");
    let tenant_id = tenant.id.to_string();
    state.tenant_repo.add_tenant(tenant).await;
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);

    let (status, body) = get_json(
        &app,
        "/api/tenant/current",
        &[("host", "acme.yachtcash.com")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], tenant_id.as_str());
    assert_eq!(body["data"]["subdomain"], "acme");
    assert_eq!(tenant_repo.subdomain_lookups(), 1);
}

#[tokio::test]
async fn test_subdomain_ignores_port_and_case() {
    let state = TestAppState::new();
    state.tenant_repo.add_tenant(create_test_tenant("acme")).await;
    let app = build_test_router(state);

    let (status, body) = get_json(
        &app,
        "/api/tenant/current",
        &[("host", "ACME.yachtcash.com:8080")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subdomain"], "acme");
}

#[tokio::test]
async fn test_header_wins_over_subdomain() {
    let state = TestAppState::new();
    let header_tenant = create_test_tenant("harbor");
    let header_id = header_tenant.id.to_string();
    state.tenant_repo.add_tenant(header_tenant).await;
    state.tenant_repo.add_tenant(create_test_tenant("acme")).await;
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);

    let (status, body) = get_json(
        &app,
        "/api/tenant/current",
        &[
            ("x-tenant-id", header_id.as_str()),
            ("host", "acme.yachtcash.com"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subdomain"], "harbor");
    assert_eq!(tenant_repo.subdomain_lookups(), 0);
}

#[tokio::test]
async fn test_www_host_yields_no_tenant_and_no_lookup() {
    let state = TestAppState::new();
    state.tenant_repo.add_tenant(create_test_tenant("www")).await;
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);

    let (status, body) = get_json(
        &app,
        "/api/tenant/current",
        &[("host", "www.yachtcash.com")],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tenant_context_required");
    assert_eq!(tenant_repo.subdomain_lookups(), 0);
}

#[tokio::test]
async fn test_apex_host_yields_no_tenant() {
    let state = TestAppState::new();
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);

    let (status, body) =
        get_json(&app, "/api/tenant/current", &[("host", "yachtcash.com")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tenant_context_required");
    assert_eq!(tenant_repo.subdomain_lookups(), 0);
}

#[tokio::test]
async fn test_unknown_subdomain_yields_no_tenant() {
    let state = TestAppState::new();
    state.tenant_repo.add_tenant(create_test_tenant("acme")).await;
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);

    let (status, body) = get_json(
        &app,
        "/api/tenant/current",
        &[("host", "nobody.yachtcash.com")],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tenant_context_required");
    assert_eq!(tenant_repo.subdomain_lookups(), 1);
}

#[tokio::test]
async fn test_single_label_host_yields_no_tenant() {
    let state = TestAppState::new();
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);

    let (status, _) = get_json(&app, "/api/tenant/current", &[("host", "localhost:3001")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(tenant_repo.subdomain_lookups(), 0);
}

#[tokio::test]
async fn test_ip_host_yields_no_tenant() {
    let state = TestAppState::new();
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);

    let (status, _) =
        get_json(&app, "/api/tenant/current", &[("host", "10.0.0.12:3001")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(tenant_repo.subdomain_lookups(), 0);
}

#[tokio::test]
async fn test_unknown_header_tenant_returns_404() {
    let state = TestAppState::new();
    let app = build_test_router(state);
    let missing = StringUuid::new_v4().to_string();

    let (status, body) = get_json(
        &app,
        "/api/tenant/current",
        &[("x-tenant-id", missing.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_malformed_header_tenant_returns_404() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, _) = get_json(
        &app,
        "/api/tenant/current",
        &[("x-tenant-id", "not-a-uuid")],
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_header_falls_back_to_subdomain() {
    let state = TestAppState::new();
    state.tenant_repo.add_tenant(create_test_tenant("acme")).await;
    let app = build_test_router(state);

    let (status, body) = get_json(
        &app,
        "/api/tenant/current",
        &[("x-tenant-id", ""), ("host", "acme.yachtcash.com")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subdomain"], "acme");
}

#[tokio::test]
async fn test_skipped_paths_never_look_up_tenants() {
    let state = TestAppState::new();
    state.tenant_repo.add_tenant(create_test_tenant("acme")).await;
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);
    let host = [("host", "acme.yachtcash.com")];

    let (status, _) = get_json(&app, "/", &host).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(&app, "/health", &host).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(&app, "/ready", &host).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(&app, "/api/super-admin/tenants", &host).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(tenant_repo.subdomain_lookups(), 0);
}
