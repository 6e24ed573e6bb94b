//! Roles and the permission catalog

use crate::domain::{
    dedup_permissions, unknown_permissions, CreateRoleInput, Role, StringUuid, UpdateRoleInput,
    DEFAULT_ROLES, PERMISSION_CATALOG,
};
use crate::error::{AppError, Result};
use crate::repository::RoleRepository;
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct PermissionInfo {
    pub name: &'static str,
    pub resource: &'static str,
    pub action: &'static str,
    pub description: &'static str,
}

pub struct RbacService<R: RoleRepository> {
    repo: Arc<R>,
}

impl<R: RoleRepository> RbacService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub fn permission_catalog(&self) -> Vec<PermissionInfo> {
        PERMISSION_CATALOG
            .iter()
            .map(|&(name, description)| {
                let (resource, action) = name.split_once('.').unwrap_or((name, ""));
                PermissionInfo {
                    name,
                    resource,
                    action,
                    description,
                }
            })
            .collect()
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.repo.list().await
    }

    /// Create a custom role. Its permissions must come from the catalog.
    pub async fn create_role(&self, input: CreateRoleInput) -> Result<Role> {
        input.validate()?;
        let permissions = checked_permissions(input.permissions)?;

        let taken = self.repo.find_by_names(&[input.name.clone()]).await?;
        if !taken.is_empty() {
            return Err(AppError::Conflict(format!(
                "Role '{}' already exists",
                input.name
            )));
        }

        let input = CreateRoleInput {
            permissions,
            ..input
        };
        let role = self.repo.create_role(&input).await?;
        tracing::info!(role = %role.name, permissions = role.permissions.len(), "Role created");
        Ok(role)
    }

    /// Update a custom role. System roles are managed by initialization only.
    pub async fn update_role(&self, id: StringUuid, input: UpdateRoleInput) -> Result<Role> {
        input.validate()?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role {} not found", id)))?;
        if existing.is_system_role {
            return Err(AppError::Forbidden("Cannot edit system roles".to_string()));
        }

        let permissions = input.permissions.map(checked_permissions).transpose()?;
        let input = UpdateRoleInput {
            permissions,
            ..input
        };
        let role = self.repo.update_role(id, &input).await?;
        tracing::info!(role = %role.name, "Role updated");
        Ok(role)
    }

    /// Upsert every default role. Safe to run repeatedly.
    pub async fn initialize_default_roles(&self) -> Result<Vec<Role>> {
        for def in DEFAULT_ROLES {
            self.repo.upsert(&Role::from_default(def)).await?;
        }
        tracing::info!(count = DEFAULT_ROLES.len(), "Default roles initialized");
        self.repo.list().await
    }
}

/// Reject permissions outside the catalog, then drop repeats.
fn checked_permissions(permissions: Vec<String>) -> Result<Vec<String>> {
    let unknown = unknown_permissions(&permissions);
    if !unknown.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Unknown permissions: {}",
            unknown.join(", ")
        )));
    }
    Ok(dedup_permissions(permissions))
}
