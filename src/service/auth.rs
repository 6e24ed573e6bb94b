//! Login and account bootstrap

use crate::domain::{
    Actor, Capabilities, CreateUserInput, LoginInput, StringUuid, User, UserStatus,
    SUPER_ADMIN_ROLE,
};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

const INVALID_LOGIN: &str = "Invalid email or password";

lazy_static::lazy_static! {
    /// Verified against when no account matches the email, so an unknown
    /// address pays the same argon2 cost as a wrong password.
    static ref DUMMY_PASSWORD_HASH: String =
        hash_password("yachtcash-unknown-account").unwrap_or_default();
}

/// Public view of a user with its effective permissions.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: StringUuid,
    pub email: String,
    pub tenant_id: Option<StringUuid>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub is_super_admin: bool,
    pub status: UserStatus,
}

impl From<&Actor> for UserProfile {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            email: actor.email.clone(),
            tenant_id: actor.tenant_id,
            roles: actor.roles.clone(),
            permissions: actor.capabilities.to_list(),
            is_super_admin: actor.capabilities == Capabilities::AllPermissions,
            status: actor.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    jwt_manager: JwtManager,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: Arc<U>, jwt_manager: JwtManager) -> Self {
        Self {
            user_repo,
            jwt_manager,
        }
    }

    /// Password login.
    ///
    /// `context_tenant` is the tenant resolved for the request. An account
    /// affiliated with a different tenant cannot log in there; accounts
    /// without an affiliation can log in anywhere.
    pub async fn login(
        &self,
        input: LoginInput,
        context_tenant: Option<&str>,
    ) -> Result<LoginResponse> {
        let result = self.attempt_login(input, context_tenant).await;
        let outcome = if result.is_ok() { "success" } else { "failure" };
        counter!("yachtcash_auth_login_total", "result" => outcome).increment(1);
        result
    }

    async fn attempt_login(
        &self,
        input: LoginInput,
        context_tenant: Option<&str>,
    ) -> Result<LoginResponse> {
        input.validate()?;

        let Some(user) = self
            .user_repo
            .find_by_email(&input.email.to_lowercase())
            .await?
        else {
            let _ = verify_password(&input.password, &DUMMY_PASSWORD_HASH);
            return Err(AppError::Unauthorized(INVALID_LOGIN.to_string()));
        };

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::info!(email = %user.email, "Login rejected: bad password");
            return Err(AppError::Unauthorized(INVALID_LOGIN.to_string()));
        }

        if user.status != UserStatus::Active {
            return Err(AppError::AccountInactive(
                "User account is not active".to_string(),
            ));
        }

        if let (Some(context), Some(affiliation)) = (context_tenant, user.tenant_id) {
            if affiliation.to_string() != context {
                tracing::info!(
                    email = %user.email,
                    context_tenant = context,
                    "Login rejected: tenant mismatch"
                );
                return Err(AppError::Unauthorized(INVALID_LOGIN.to_string()));
            }
        }

        self.user_repo.record_login(user.id).await?;
        let token = self.jwt_manager.create_access_token(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer",
            expires_in: self.jwt_manager.access_token_ttl(),
            user,
        })
    }

    /// Create the platform super-admin account unless the email is taken.
    ///
    /// Returns `true` when an account was created.
    pub async fn ensure_super_admin(&self, email: &str, password: &str) -> Result<bool> {
        if self.user_repo.find_by_email(&email.to_lowercase()).await?.is_some() {
            return Ok(false);
        }

        let input = CreateUserInput {
            email: email.to_lowercase(),
            password_hash: hash_password(password)?,
            tenant_id: None,
            assigned_roles: vec![SUPER_ADMIN_ROLE.to_string()],
        };
        input.validate()?;

        let user = self.user_repo.create(&input).await?;
        tracing::info!(user_id = %user.id, email = %user.email, "Super-admin account created");
        Ok(true)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// A malformed stored hash is an internal error, not a failed login.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
