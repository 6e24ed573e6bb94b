//! Authorization and tenant scoping of `GET /api/tenant/cash-balances`.

use super::{bearer, build_test_router, get_json, TestAppState};
use crate::api::{create_test_balance, create_test_tenant, create_test_user};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use yachtcash_core::domain::{StringUuid, UserStatus};

const PATH: &str = "/api/tenant/cash-balances";

/// State with one tenant holding two yachts' balances
async fn seeded_state() -> (TestAppState, StringUuid) {
    let state = TestAppState::new();
    let tenant = create_test_tenant("acme");
    let tenant_id = tenant.id;
    state.tenant_repo.add_tenant(tenant).await;
    state
        .cash_repo
        .add_balance(tenant_id, create_test_balance("Aurora", "EUR", 150_000))
        .await;
    state
        .cash_repo
        .add_balance(tenant_id, create_test_balance("Aurora", "USD", 20_000))
        .await;
    state
        .cash_repo
        .add_balance(tenant_id, create_test_balance("Blue Horizon", "eur", 50_000))
        .await;
    (state, tenant_id)
}

#[tokio::test]
async fn test_anonymous_request_is_unauthorized() {
    let (state, _) = seeded_state().await;
    let app = build_test_router(state);

    let (status, body) = get_json(&app, PATH, &[("host", "acme.yachtcash.com")]).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let (state, _) = seeded_state().await;
    let app = build_test_router(state);

    let (status, _) = get_json(
        &app,
        PATH,
        &[
            ("host", "acme.yachtcash.com"),
            ("authorization", "Bearer not.a.token"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_captain_reads_own_tenant_balances() {
    let (state, tenant_id) = seeded_state().await;
    let token = state
        .login_as(create_test_user("captain@acme.test", &["captain"], Some(tenant_id)))
        .await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        PATH,
        &[("host", "acme.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balances"].as_array().unwrap().len(), 3);

    let totals = body["data"]["totals"].as_array().unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0]["currency_code"], "EUR");
    assert_eq!(totals[0]["amount_minor"], 200_000);
    assert_eq!(totals[0]["yacht_count"], 2);
    assert_eq!(totals[1]["currency_code"], "USD");
    assert_eq!(totals[1]["amount_minor"], 20_000);
}

#[tokio::test]
async fn test_currency_filter() {
    let (state, tenant_id) = seeded_state().await;
    let token = state
        .login_as(create_test_user("captain@acme.test", &["captain"], Some(tenant_id)))
        .await;
    let app = build_test_router(state);
    let auth = bearer(&token);
    let headers = [("host", "acme.yachtcash.com"), ("authorization", auth.as_str())];

    let (status, body) = get_json(&app, "/api/tenant/cash-balances?currency=usd", &headers).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balances"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["totals"][0]["currency_code"], "USD");

    let (status, body) = get_json(&app, "/api/tenant/cash-balances?currency=EURO", &headers).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_crew_without_cash_view_is_forbidden() {
    let (state, tenant_id) = seeded_state().await;
    let token = state
        .login_as(create_test_user("deckhand@acme.test", &["crew"], Some(tenant_id)))
        .await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        PATH,
        &[("host", "acme.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_direct_permission_grant_allows_crew() {
    let (state, tenant_id) = seeded_state().await;
    let mut user = create_test_user("purser@acme.test", &["crew"], Some(tenant_id));
    user.permissions = vec!["cash.view".to_string()];
    let token = state.login_as(user).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, _) = get_json(
        &app,
        PATH,
        &[("host", "acme.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_without_roles_is_forbidden_despite_grants() {
    let (state, tenant_id) = seeded_state().await;
    let mut user = create_test_user("ghost@acme.test", &[], Some(tenant_id));
    user.permissions = vec!["cash.view".to_string()];
    let token = state.login_as(user).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, _) = get_json(
        &app,
        PATH,
        &[("host", "acme.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_inactive_captain_is_rejected_as_inactive() {
    let (state, tenant_id) = seeded_state().await;
    let user = create_test_user("captain@acme.test", &["captain"], Some(tenant_id));
    let user_id = user.id;
    let token = state.login_as(user).await;
    state.user_repo.set_status(user_id, UserStatus::Inactive).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        PATH,
        &[("host", "acme.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "account_inactive");
}

#[tokio::test]
async fn test_inactive_super_admin_is_rejected() {
    let (state, _) = seeded_state().await;
    let mut user = create_test_user("root@yachtcash.test", &["super-admin"], None);
    user.status = UserStatus::Suspended;
    let token = state.login_as(user).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        PATH,
        &[("host", "acme.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "account_inactive");
}

#[tokio::test]
async fn test_roles_are_read_from_the_live_record() {
    let (state, tenant_id) = seeded_state().await;
    let user = create_test_user("captain@acme.test", &["captain"], Some(tenant_id));
    let user_id = user.id;
    let token = state.login_as(user).await;
    state
        .user_repo
        .set_roles(user_id, vec!["crew".to_string()])
        .await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, _) = get_json(
        &app,
        PATH,
        &[("host", "acme.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleted_user_is_unauthorized() {
    let (state, tenant_id) = seeded_state().await;
    let user = create_test_user("captain@acme.test", &["captain"], Some(tenant_id));
    let user_id = user.id;
    let token = state.login_as(user).await;
    state.user_repo.remove_user(user_id).await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, _) = get_json(
        &app,
        PATH,
        &[("host", "acme.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authorized_request_without_tenant_needs_context() {
    let (state, _) = seeded_state().await;
    let token = state
        .login_as(create_test_user("root@yachtcash.test", &["super-admin"], None))
        .await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        PATH,
        &[("host", "www.yachtcash.com"), ("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tenant_context_required");
}

#[tokio::test]
async fn test_captain_cannot_read_another_tenant() {
    let (state, tenant_id) = seeded_state().await;
    let other = create_test_tenant("harbor");
    let other_id = other.id.to_string();
    state.tenant_repo.add_tenant(other).await;
    let token = state
        .login_as(create_test_user("captain@acme.test", &["captain"], Some(tenant_id)))
        .await;
    let app = build_test_router(state);
    let auth = bearer(&token);

    let (status, body) = get_json(
        &app,
        PATH,
        &[
            ("x-tenant-id", other_id.as_str()),
            ("authorization", auth.as_str()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_super_admin_reads_any_tenant() {
    let (state, tenant_id) = seeded_state().await;
    let token = state
        .login_as(create_test_user("root@yachtcash.test", &["super-admin"], None))
        .await;
    let app = build_test_router(state);
    let auth = bearer(&token);
    let header_id = tenant_id.to_string();

    let (status, body) = get_json(
        &app,
        PATH,
        &[
            ("x-tenant-id", header_id.as_str()),
            ("authorization", auth.as_str()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balances"].as_array().unwrap().len(), 3);
}
