//! Roles, the permission catalog and the authorization view of a user

use super::common::StringUuid;
use super::user::{User, UserStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use validator::Validate;

/// Role name that grants every permission, including ones absent from the catalog.
pub const SUPER_ADMIN_ROLE: &str = "super-admin";

/// Every permission the API checks, with a human description.
pub const PERMISSION_CATALOG: &[(&str, &str)] = &[
    ("users.view", "View user accounts and profiles"),
    ("users.create", "Create new user accounts"),
    ("users.edit", "Edit existing user accounts"),
    ("users.delete", "Deactivate user accounts"),
    ("roles.view", "View roles and permissions"),
    ("roles.create", "Create new roles"),
    ("roles.edit", "Edit existing roles"),
    ("roles.delete", "Delete roles"),
    ("yachts.view", "View yacht information"),
    ("yachts.create", "Create new yacht records"),
    ("yachts.edit", "Edit yacht information"),
    ("yachts.delete", "Remove yacht records"),
    ("transactions.view", "View transactions"),
    ("transactions.create", "Create new transactions"),
    ("transactions.edit", "Edit existing transactions"),
    ("transactions.delete", "Delete transactions"),
    ("transactions.flag", "Flag transactions for review"),
    ("transactions.approve", "Approve flagged transactions"),
    ("cash.view", "View cash balances"),
    ("cash.manage", "Manage cash balances and limits"),
    ("reports.view", "View reports and analytics"),
    ("reports.export", "Export report data"),
    ("system.configure", "Configure system settings"),
    ("system.monitor", "Monitor system health and statistics"),
];

/// Seed definition of a system role.
#[derive(Debug, Clone, Copy)]
pub struct DefaultRole {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// `None` means the whole catalog
    pub permissions: Option<&'static [&'static str]>,
    pub sort_order: i32,
}

impl DefaultRole {
    pub fn permission_list(&self) -> Vec<String> {
        match self.permissions {
            Some(list) => list.iter().map(|p| p.to_string()).collect(),
            None => PERMISSION_CATALOG
                .iter()
                .map(|(name, _)| name.to_string())
                .collect(),
        }
    }
}

pub const DEFAULT_ROLES: &[DefaultRole] = &[
    DefaultRole {
        name: SUPER_ADMIN_ROLE,
        display_name: "Super Administrator",
        description: "Full system access with all permissions",
        permissions: None,
        sort_order: 0,
    },
    DefaultRole {
        name: "admin",
        display_name: "Administrator",
        description: "Administrative access to most system functions",
        permissions: Some(&[
            "users.view",
            "users.create",
            "users.edit",
            "roles.view",
            "roles.create",
            "roles.edit",
            "yachts.view",
            "yachts.create",
            "yachts.edit",
            "transactions.view",
            "transactions.edit",
            "transactions.flag",
            "transactions.approve",
            "cash.view",
            "cash.manage",
            "reports.view",
            "reports.export",
            "system.monitor",
        ]),
        sort_order: 1,
    },
    DefaultRole {
        name: "manager",
        display_name: "Yacht Manager",
        description: "Management access for yacht operations and oversight",
        permissions: Some(&[
            "users.view",
            "yachts.view",
            "yachts.edit",
            "transactions.view",
            "transactions.edit",
            "transactions.flag",
            "cash.view",
            "reports.view",
        ]),
        sort_order: 2,
    },
    DefaultRole {
        name: "captain",
        display_name: "Captain",
        description: "Operational access for yacht captains",
        permissions: Some(&[
            "transactions.view",
            "transactions.create",
            "transactions.edit",
            "cash.view",
        ]),
        sort_order: 3,
    },
    DefaultRole {
        name: "crew",
        display_name: "Crew Member",
        description: "Limited access for crew members",
        permissions: Some(&["transactions.view", "transactions.create"]),
        sort_order: 4,
    },
];

/// Stored role
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: StringUuid,
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Ordered and free of duplicates
    #[sqlx(json)]
    pub permissions: Vec<String>,
    pub is_system_role: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn from_default(def: &DefaultRole) -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: def.name.to_string(),
            display_name: def.display_name.to_string(),
            description: def.description.to_string(),
            permissions: dedup_permissions(def.permission_list()),
            is_system_role: true,
            sort_order: def.sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Drop repeated permissions, keeping the first occurrence's position.
pub fn dedup_permissions(permissions: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    permissions
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Input for creating a custom role
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleInput {
    #[validate(length(min = 1, max = 50), custom(function = "validate_role_name"))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub sort_order: Option<i32>,
}

/// Input for updating a custom role. The name is fixed once created, since
/// users reference roles by name.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoleInput {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub sort_order: Option<i32>,
}

fn validate_role_name(name: &str) -> Result<(), validator::ValidationError> {
    if ROLE_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_role_name"))
    }
}

lazy_static::lazy_static! {
    /// Lowercase slug: alphanumerics separated by single hyphens.
    static ref ROLE_NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Entries of `permissions` absent from the catalog, in input order.
pub fn unknown_permissions(permissions: &[String]) -> Vec<&str> {
    permissions
        .iter()
        .filter(|p| !PERMISSION_CATALOG.iter().any(|(name, _)| *name == p.as_str()))
        .map(String::as_str)
        .collect()
}

/// What an actor is allowed to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "permissions", rename_all = "snake_case")]
pub enum Capabilities {
    /// Super-admin: every check passes without comparison
    AllPermissions,
    PermissionSet(BTreeSet<String>),
}

impl Capabilities {
    /// Effective capabilities for a set of assigned roles.
    ///
    /// Union of every assigned role's permissions plus the user's direct
    /// grants. Role names without a stored role contribute nothing.
    pub fn effective(assigned_roles: &[String], roles: &[Role], overrides: &[String]) -> Self {
        if assigned_roles.iter().any(|r| r == SUPER_ADMIN_ROLE) {
            return Capabilities::AllPermissions;
        }

        let mut set: BTreeSet<String> = roles
            .iter()
            .filter(|role| assigned_roles.contains(&role.name))
            .flat_map(|role| role.permissions.iter().cloned())
            .collect();
        set.extend(overrides.iter().cloned());
        Capabilities::PermissionSet(set)
    }

    /// First required permission these capabilities hold.
    ///
    /// OR semantics: one shared permission is enough. `AllPermissions`
    /// matches the first entry; an empty requirement never matches.
    pub fn first_grant<'a>(&self, required: &[&'a str]) -> Option<&'a str> {
        match self {
            Capabilities::AllPermissions => required.first().copied(),
            Capabilities::PermissionSet(set) => {
                required.iter().find(|p| set.contains(**p)).copied()
            }
        }
    }

    /// Flattened list for display. `AllPermissions` expands to the catalog.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Capabilities::AllPermissions => PERMISSION_CATALOG
                .iter()
                .map(|(name, _)| name.to_string())
                .collect(),
            Capabilities::PermissionSet(set) => set.iter().cloned().collect(),
        }
    }
}

/// Authorization view of a user, built from the live record.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: StringUuid,
    pub email: String,
    pub tenant_id: Option<StringUuid>,
    pub roles: Vec<String>,
    pub status: UserStatus,
    pub capabilities: Capabilities,
}

impl Actor {
    pub fn from_user(user: &User, roles: &[Role]) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            tenant_id: user.tenant_id,
            roles: user.assigned_roles.clone(),
            status: user.status,
            capabilities: Capabilities::effective(&user.assigned_roles, roles, &user.permissions),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
