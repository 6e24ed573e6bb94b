//! Tenant domain model

use super::common::{impl_mysql_string_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Tenant status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    #[default]
    Active,
    Suspended,
    Trial,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Trial => "trial",
        }
    }
}

impl std::str::FromStr for TenantStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(TenantStatus::Active),
            "suspended" => Ok(TenantStatus::Suspended),
            "trial" => Ok(TenantStatus::Trial),
            _ => Err(format!("Unknown tenant status: {}", s)),
        }
    }
}

impl_mysql_string_enum!(TenantStatus);

/// Subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Basic,
    Professional,
    Enterprise,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Basic => "basic",
            SubscriptionPlan::Professional => "professional",
            SubscriptionPlan::Enterprise => "enterprise",
        }
    }
}

impl std::str::FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(SubscriptionPlan::Basic),
            "professional" => Ok(SubscriptionPlan::Professional),
            "enterprise" => Ok(SubscriptionPlan::Enterprise),
            _ => Err(format!("Unknown subscription plan: {}", s)),
        }
    }
}

impl_mysql_string_enum!(SubscriptionPlan);

/// Tenant entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: StringUuid,
    /// Unique DNS label; never changes once assigned
    pub subdomain: String,
    pub name: String,
    pub status: TenantStatus,
    pub subscription_plan: SubscriptionPlan,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Tenant {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            subdomain: String::new(),
            name: String::new(),
            status: TenantStatus::default(),
            subscription_plan: SubscriptionPlan::default(),
            trial_ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new tenant
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTenantInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 63), custom(function = "validate_subdomain"))]
    pub subdomain: String,
    #[serde(default)]
    pub status: Option<TenantStatus>,
    #[serde(default)]
    pub subscription_plan: Option<SubscriptionPlan>,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

/// Input for changing a tenant's lifecycle status.
///
/// There is no rename path; the subdomain never changes.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTenantStatusInput {
    pub status: TenantStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

fn validate_subdomain(subdomain: &str) -> Result<(), validator::ValidationError> {
    if SUBDOMAIN_REGEX.is_match(subdomain) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_subdomain"))
    }
}

lazy_static::lazy_static! {
    /// Lowercase DNS label: alphanumerics separated by single hyphens.
    pub static ref SUBDOMAIN_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}
