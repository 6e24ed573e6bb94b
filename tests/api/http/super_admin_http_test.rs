//! Platform tenant management endpoints.

use super::{bearer, build_test_router, get_json, post_json, send_json, TestAppState};
use crate::api::{create_test_tenant, create_test_user};
use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use yachtcash_core::domain::StringUuid;

async fn super_admin_token(state: &TestAppState) -> String {
    state
        .login_as(create_test_user("root@yachtcash.test", &["super-admin"], None))
        .await
}

#[tokio::test]
async fn test_list_tenants_requires_authentication() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body) = get_json(&app, "/api/super-admin/tenants", &[]).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_list_tenants_forbidden_for_admin() {
    let state = TestAppState::new();
    let token = state
        .login_as(create_test_user("admin@acme.test", &["admin"], None))
        .await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, _) = get_json(
        &app,
        "/api/super-admin/tenants",
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_tenants_pagination() {
    let state = TestAppState::new();
    for i in 1..=25 {
        state
            .tenant_repo
            .add_tenant(create_test_tenant(&format!("fleet-{}", i)))
            .await;
    }
    let token = super_admin_token(&state).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        "/api/super-admin/tenants?page=2&per_page=10",
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["total"], 25);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn test_list_tenants_page_out_of_range() {
    let state = TestAppState::new();
    state
        .tenant_repo
        .add_tenant(create_test_tenant("fleet-1"))
        .await;
    let token = super_admin_token(&state).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        "/api/super-admin/tenants?page=9223372036854775807&per_page=20",
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_create_tenant() {
    let state = TestAppState::new();
    let token = super_admin_token(&state).await;
    let tenant_repo = state.tenant_repo.clone();
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = post_json(
        &app,
        "/api/super-admin/tenants",
        &[("authorization", auth.as_str())],
        json!({ "name": "Acme Yachting", "subdomain": "acme", "subscription_plan": "enterprise" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["subdomain"], "acme");
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["subscription_plan"], "enterprise");
    assert_eq!(tenant_repo.count_tenants().await, 1);
}

#[tokio::test]
async fn test_create_tenant_duplicate_subdomain() {
    let state = TestAppState::new();
    state.tenant_repo.add_tenant(create_test_tenant("acme")).await;
    let token = super_admin_token(&state).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = post_json(
        &app,
        "/api/super-admin/tenants",
        &[("authorization", auth.as_str())],
        json!({ "name": "Another Acme", "subdomain": "acme" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_create_tenant_reserved_subdomain() {
    let state = TestAppState::new();
    let token = super_admin_token(&state).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    for reserved in ["www", "yachtcash"] {
        let (status, body) = post_json(
            &app,
            "/api/super-admin/tenants",
            &[("authorization", auth.as_str())],
            json!({ "name": "Reserved", "subdomain": reserved }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "subdomain {}", reserved);
        assert_eq!(body["error"], "bad_request");
    }
}

#[tokio::test]
async fn test_create_tenant_invalid_subdomain() {
    let state = TestAppState::new();
    let token = super_admin_token(&state).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = post_json(
        &app,
        "/api/super-admin/tenants",
        &[("authorization", auth.as_str())],
        json!({ "name": "Bad", "subdomain": "Not_A_Label" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn test_create_tenant_checks_permission_before_body() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, _) = post_json(
        &app,
        "/api/super-admin/tenants",
        &[],
        json!({ "unexpected": true }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_tenant() {
    let state = TestAppState::new();
    let tenant = create_test_tenant("acme");
    let tenant_id = tenant.id.to_string();
    state.tenant_repo.add_tenant(tenant).await;
    let token = super_admin_token(&state).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        &format!("/api/super-admin/tenants/{}", tenant_id),
        &[("authorization", auth.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], tenant_id.as_str());

    let (status, _) = get_json(
        &app,
        &format!("/api/super-admin/tenants/{}", StringUuid::new_v4()),
        &[("authorization", auth.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_tenant_status() {
    let state = TestAppState::new();
    let tenant = create_test_tenant("acme");
    let tenant_id = tenant.id.to_string();
    state.tenant_repo.add_tenant(tenant).await;
    let token = super_admin_token(&state).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/super-admin/tenants/{}/status", tenant_id),
        &[("authorization", auth.as_str())],
        Some(json!({ "status": "suspended" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "suspended");
    assert_eq!(body["data"]["subdomain"], "acme");
}
