//! Tenant context middleware and extractors

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::HOST, request::Parts, Request},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::HasServices;
use crate::tenancy::{resolve_tenant, RequestContext};

/// Resolve the tenant and store a [`RequestContext`] in the request extensions.
///
/// Wraps every route. Never rejects a request.
pub async fn tenant_context_middleware<S: HasServices>(
    State(state): State<S>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let host = parts
        .headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| parts.uri.host())
        .map(str::to_owned);

    let context = resolve_tenant(
        state.tenant_service().repository(),
        &parts.headers,
        host.as_deref(),
        parts.uri.path(),
        &state.config().tenancy,
    )
    .await;

    tracing::debug!(
        tenant_id = context.tenant_id().unwrap_or("-"),
        source = context.source().as_str(),
        "Tenant context"
    );

    parts.extensions.insert(context);
    next.run(Request::from_parts(parts, body)).await
}

/// The request's tenant context, possibly without a tenant.
#[derive(Debug, Clone)]
pub struct TenantContext(pub RequestContext);

impl<S: Send + Sync> FromRequestParts<S> for TenantContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(RequestContext::skipped);
        Ok(TenantContext(context))
    }
}

/// Tenant id of the request. Rejects with `TenantContextRequired` when unresolved.
#[derive(Debug, Clone)]
pub struct RequireTenant(pub String);

impl<S: Send + Sync> FromRequestParts<S> for RequireTenant {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.tenant_id())
            .map(|id| RequireTenant(id.to_string()))
            .ok_or(AppError::TenantContextRequired)
    }
}
