//! Role and permission catalog endpoints

use crate::api::{json_body, SuccessResponse};
use crate::domain::{CreateRoleInput, StringUuid, UpdateRoleInput};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::policy::enforce;
use crate::state::HasServices;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// GET /api/admin/permissions
pub async fn list_permissions<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
) -> Result<impl IntoResponse> {
    enforce(&state, claim.as_ref(), &["roles.view"]).await?;
    Ok(Json(SuccessResponse::new(
        state.rbac_service().permission_catalog(),
    )))
}

/// GET /api/admin/roles
pub async fn list_roles<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
) -> Result<impl IntoResponse> {
    enforce(&state, claim.as_ref(), &["roles.view"]).await?;
    let roles = state.rbac_service().list_roles().await?;
    Ok(Json(SuccessResponse::new(roles)))
}

/// POST /api/admin/roles
pub async fn create_role<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
    body: std::result::Result<Json<CreateRoleInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let actor = enforce(&state, claim.as_ref(), &["roles.create"]).await?;
    let input = json_body(body)?;

    let role = state.rbac_service().create_role(input).await?;
    tracing::info!(user_id = %actor.id, role_id = %role.id, "Role created by admin");
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(role))))
}

/// PATCH /api/admin/roles/{id}
pub async fn update_role<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
    Path(id): Path<StringUuid>,
    body: std::result::Result<Json<UpdateRoleInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    enforce(&state, claim.as_ref(), &["roles.edit"]).await?;
    let input = json_body(body)?;

    let role = state.rbac_service().update_role(id, input).await?;
    Ok(Json(SuccessResponse::new(role)))
}

/// POST /api/admin/system/initialize
pub async fn initialize_system<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
) -> Result<impl IntoResponse> {
    let actor = enforce(&state, claim.as_ref(), &["system.configure"]).await?;
    let roles = state.rbac_service().initialize_default_roles().await?;
    tracing::info!(user_id = %actor.id, "System roles initialized");
    Ok(Json(SuccessResponse::new(roles)))
}
