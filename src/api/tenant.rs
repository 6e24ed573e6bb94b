//! Endpoints scoped to the request's tenant

use crate::api::SuccessResponse;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireTenant, TenantContext};
use crate::policy::{enforce, ensure_tenant_scope};
use crate::state::HasServices;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

/// GET /api/tenant/current
pub async fn current<S: HasServices>(
    State(state): State<S>,
    RequireTenant(tenant_id): RequireTenant,
) -> Result<impl IntoResponse> {
    let tenant = state.tenant_service().get_by_context_id(&tenant_id).await?;
    Ok(Json(SuccessResponse::new(tenant)))
}

#[derive(Debug, Deserialize)]
pub struct CashBalanceQuery {
    pub currency: Option<String>,
}

/// GET /api/tenant/cash-balances
///
/// Authorization runs before the tenant check, so an anonymous caller
/// always gets 401.
pub async fn cash_balances<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(claim): OptionalAuth,
    TenantContext(context): TenantContext,
    Query(query): Query<CashBalanceQuery>,
) -> Result<impl IntoResponse> {
    let actor = enforce(&state, claim.as_ref(), &["cash.view"]).await?;
    let tenant_id = context
        .tenant_id()
        .ok_or(AppError::TenantContextRequired)?;
    ensure_tenant_scope(&actor, tenant_id)?;

    let summary = match query.currency.as_deref() {
        Some(currency) => {
            state
                .cash_service()
                .summary_for_currency(tenant_id, currency)
                .await?
        }
        None => state.cash_service().summary(tenant_id).await?,
    };
    Ok(Json(SuccessResponse::new(summary)))
}
