//! User domain model

use super::common::{impl_mysql_string_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Account status. Only `Active` passes authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Suspended => "suspended",
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Unknown user status: {}", s)),
        }
    }
}

impl_mysql_string_enum!(UserStatus);

/// Stored user record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: StringUuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// `None` for platform-level and legacy accounts
    pub tenant_id: Option<StringUuid>,
    /// Role names, not foreign keys
    #[sqlx(json)]
    pub assigned_roles: Vec<String>,
    /// Direct permission grants on top of the roles
    #[sqlx(json)]
    pub permissions: Vec<String>,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            email: String::new(),
            password_hash: String::new(),
            tenant_id: None,
            assigned_roles: Vec::new(),
            permissions: Vec::new(),
            status: UserStatus::default(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a user record (password already hashed)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email)]
    pub email: String,
    pub password_hash: String,
    pub tenant_id: Option<StringUuid>,
    #[validate(length(min = 1))]
    pub assigned_roles: Vec<String>,
}

/// Login request body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}
