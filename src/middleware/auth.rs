//! Bearer token extractors
//!
//! Provides:
//! - `AuthUser` extractor for handlers that need a verified claim
//! - `OptionalAuth` extractor that turns a missing or invalid token into `None`

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use serde::{Deserialize, Serialize};

use crate::domain::StringUuid;
use crate::error::AppError;
use crate::jwt::AccessClaims;
use crate::state::HasServices;

/// Verified actor claim taken from an access token.
///
/// Only identifies the actor. Roles and status are re-read from storage
/// before any authorization decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: StringUuid,
    pub email: String,
    pub roles: Vec<String>,
    pub tenant_id: Option<String>,
}

impl AuthUser {
    pub fn from_claims(claims: AccessClaims) -> Result<Self, AppError> {
        let user_id = StringUuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid or missing credentials".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email,
            roles: claims.roles,
            tenant_id: claims.tenant_id,
        })
    }
}

/// Bearer token from the Authorization header, if well formed.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Invalid or missing credentials".to_string()))?;

        let claims = state.jwt_manager().verify_access_token(token)?;
        AuthUser::from_claims(claims)
    }
}

/// Optional authentication extractor
///
/// `None` when the token is absent or fails verification. The authorizer
/// treats both the same way.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: HasServices + Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalAuth(Some(user))),
            Err(e) => {
                if parts.headers.contains_key(AUTHORIZATION) {
                    tracing::debug!(error = %e, "Rejected bearer token");
                }
                Ok(OptionalAuth(None))
            }
        }
    }
}
