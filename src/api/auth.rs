//! Authentication endpoints

use crate::api::{json_body, MessageResponse, SuccessResponse};
use crate::domain::{LoginInput, Tenant};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, TenantContext};
use crate::service::UserProfile;
use crate::state::HasServices;
use axum::{extract::rejection::JsonRejection, extract::State, response::IntoResponse, Json};
use serde::Serialize;

/// POST /api/auth/login
pub async fn login<S: HasServices>(
    State(state): State<S>,
    TenantContext(context): TenantContext,
    body: std::result::Result<Json<LoginInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let input = json_body(body)?;
    let response = state
        .auth_service()
        .login(input, context.tenant_id())
        .await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub tenant: Option<Tenant>,
}

/// GET /api/auth/me
pub async fn me<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
) -> Result<impl IntoResponse> {
    let actor = state.authorizer().authenticate(claim.as_ref()).await?;

    let tenant = match actor.tenant_id {
        Some(id) => match state.tenant_service().get(id).await {
            Ok(tenant) => Some(tenant),
            Err(AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        },
        None => None,
    };

    Ok(Json(SuccessResponse::new(MeResponse {
        profile: UserProfile::from(&actor),
        tenant,
    })))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
) -> Result<impl IntoResponse> {
    let actor = state.authorizer().authenticate(claim.as_ref()).await?;
    tracing::info!(user_id = %actor.id, "User logged out");
    Ok(Json(MessageResponse::new("Logged out successfully")))
}
