//! Platform tenant management. Every endpoint requires `system.configure`.

use crate::api::{json_body, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{CreateTenantInput, StringUuid, UpdateTenantStatusInput};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::policy::enforce;
use crate::state::HasServices;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

const PERMISSION: &[&str] = &["system.configure"];

/// GET /api/super-admin/tenants
pub async fn list_tenants<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    enforce(&state, claim.as_ref(), PERMISSION).await?;

    let (tenants, total) = state
        .tenant_service()
        .list(pagination.page, pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        tenants,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// POST /api/super-admin/tenants
pub async fn create_tenant<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
    body: std::result::Result<Json<CreateTenantInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let actor = enforce(&state, claim.as_ref(), PERMISSION).await?;
    let input = json_body(body)?;

    let tenant = state.tenant_service().create(input).await?;
    tracing::info!(user_id = %actor.id, tenant_id = %tenant.id, "Tenant created by super-admin");
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(tenant))))
}

/// GET /api/super-admin/tenants/{id}
pub async fn get_tenant<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    enforce(&state, claim.as_ref(), PERMISSION).await?;
    let tenant = state.tenant_service().get(id).await?;
    Ok(Json(SuccessResponse::new(tenant)))
}

/// PATCH /api/super-admin/tenants/{id}/status
pub async fn update_tenant_status<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
    Path(id): Path<StringUuid>,
    body: std::result::Result<Json<UpdateTenantStatusInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    enforce(&state, claim.as_ref(), PERMISSION).await?;
    let input = json_body(body)?;

    let tenant = state.tenant_service().update_status(id, input).await?;
    Ok(Json(SuccessResponse::new(tenant)))
}
