//! Access authorization for HTTP handlers.
//!
//! A decision walks `START -> AUTHENTICATED -> STATUS_OK -> {BYPASS |
//! PERMISSION_CHECKED} -> ALLOW`, leaving early with a [`DenyReason`] at
//! each gate. [`Authorizer::check`] covers authentication and the live
//! actor lookup; [`authorize`] is the pure remainder.

use crate::domain::{Actor, Capabilities};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::repository::{RoleRepository, UserRepository};
use crate::state::HasServices;
use metrics::counter;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No claim, or a claim for an actor that no longer exists
    Unauthenticated,
    /// Actor exists but its account is not active
    Inactive,
    /// Active actor without any of the required permissions
    Forbidden,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::Inactive => "inactive",
            DenyReason::Forbidden => "forbidden",
        }
    }
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => {
                AppError::Unauthorized("Invalid or missing credentials".to_string())
            }
            DenyReason::Inactive => {
                AppError::AccountInactive("User account is not active".to_string())
            }
            DenyReason::Forbidden => AppError::Forbidden("Insufficient permissions".to_string()),
        }
    }
}

/// How an allowed decision was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allow {
    /// Super-admin; no comparison was made
    Bypass,
    /// First required permission found in the effective set
    Granted(String),
}

impl Allow {
    fn as_str(&self) -> &'static str {
        match self {
            Allow::Bypass => "bypass",
            Allow::Granted(_) => "granted",
        }
    }
}

/// Status, bypass and permission gates for an identified actor.
///
/// `required` has OR semantics. An empty list only passes the bypass, and an
/// actor without assigned roles is denied unless it is a super-admin.
pub fn authorize(actor: &Actor, required: &[&str]) -> std::result::Result<Allow, DenyReason> {
    if !actor.is_active() {
        return Err(DenyReason::Inactive);
    }

    if actor.capabilities == Capabilities::AllPermissions {
        return Ok(Allow::Bypass);
    }

    if actor.roles.is_empty() {
        return Err(DenyReason::Forbidden);
    }

    actor
        .capabilities
        .first_grant(required)
        .map(|p| Allow::Granted(p.to_string()))
        .ok_or(DenyReason::Forbidden)
}

/// Resolves claims into live actors and applies [`authorize`].
pub struct Authorizer<U: UserRepository, R: RoleRepository> {
    user_repo: Arc<U>,
    role_repo: Arc<R>,
}

impl<U: UserRepository, R: RoleRepository> Authorizer<U, R> {
    pub fn new(user_repo: Arc<U>, role_repo: Arc<R>) -> Self {
        Self {
            user_repo,
            role_repo,
        }
    }

    /// Build the actor for a claim from the current user record.
    ///
    /// `Ok(None)` when the claim's actor no longer exists.
    pub async fn load_actor(&self, claim: &AuthUser) -> Result<Option<Actor>> {
        let Some(user) = self.user_repo.find_by_id(claim.user_id).await? else {
            return Ok(None);
        };
        let roles = self.role_repo.find_by_names(&user.assigned_roles).await?;
        Ok(Some(Actor::from_user(&user, &roles)))
    }

    /// Authentication and status gates only, for endpoints that need an
    /// identified actor but no particular permission.
    pub async fn authenticate(&self, claim: Option<&AuthUser>) -> Result<Actor> {
        let actor = self.identify(claim, &[]).await?;
        if !actor.is_active() {
            return Err(record_denial(DenyReason::Inactive, Some(&actor.email), &[]));
        }
        Ok(actor)
    }

    /// Full decision for an optional claim. Never mutates state.
    pub async fn check(&self, claim: Option<&AuthUser>, required: &[&str]) -> Result<Actor> {
        let actor = self.identify(claim, required).await?;

        match authorize(&actor, required) {
            Ok(allow) => {
                counter!("yachtcash_authz_decisions_total", "outcome" => allow.as_str())
                    .increment(1);
                tracing::debug!(user_id = %actor.id, ?allow, "Access granted");
                Ok(actor)
            }
            Err(reason) => Err(record_denial(reason, Some(&actor.email), required)),
        }
    }

    async fn identify(&self, claim: Option<&AuthUser>, required: &[&str]) -> Result<Actor> {
        let Some(claim) = claim else {
            return Err(record_denial(DenyReason::Unauthenticated, None, required));
        };

        match self.load_actor(claim).await? {
            Some(actor) => Ok(actor),
            None => Err(record_denial(
                DenyReason::Unauthenticated,
                Some(&claim.email),
                required,
            )),
        }
    }
}

fn record_denial(reason: DenyReason, email: Option<&str>, required: &[&str]) -> AppError {
    counter!("yachtcash_authz_decisions_total", "outcome" => reason.as_str()).increment(1);
    tracing::info!(
        reason = reason.as_str(),
        email = email.unwrap_or("-"),
        required = ?required,
        "Access denied"
    );
    reason.into()
}

/// Keep tenant-affiliated actors inside their own tenant.
///
/// Super-admins and actors without an affiliation may act on any tenant.
pub fn ensure_tenant_scope(actor: &Actor, tenant_id: &str) -> Result<()> {
    if actor.capabilities == Capabilities::AllPermissions {
        return Ok(());
    }
    match actor.tenant_id {
        Some(own) if own.to_string() != tenant_id => {
            Err(record_denial(DenyReason::Forbidden, Some(&actor.email), &[]))
        }
        _ => Ok(()),
    }
}

/// Gate a handler behind any one of `required`.
pub async fn enforce<S: HasServices>(
    state: &S,
    claim: Option<&AuthUser>,
    required: &[&str],
) -> Result<Actor> {
    state.authorizer().check(claim, required).await
}
