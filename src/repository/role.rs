//! Role repository

use crate::domain::{CreateRoleInput, Role, StringUuid, UpdateRoleInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{MySql, MySqlPool, QueryBuilder};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Role>>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Role>>;
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Role>>;
    /// Insert a custom role. Never marked as a system role.
    async fn create_role(&self, input: &CreateRoleInput) -> Result<Role>;
    /// Overwrite the provided fields. Absent fields keep their stored value.
    async fn update_role(&self, id: StringUuid, input: &UpdateRoleInput) -> Result<Role>;
    /// Insert or replace by role name. The stored id of an existing role is kept.
    async fn upsert(&self, role: &Role) -> Result<()>;
}

pub struct RoleRepositoryImpl {
    pool: MySqlPool,
}

impl RoleRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const ROLE_COLUMNS: &str =
    "id, name, display_name, description, permissions, is_system_role, sort_order, created_at, updated_at";

#[async_trait]
impl RoleRepository for RoleRepositoryImpl {
    async fn list(&self) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(&format!(
            "SELECT {} FROM roles ORDER BY sort_order, name",
            ROLE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {} FROM roles WHERE id = ?",
            ROLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Role>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM roles WHERE name IN (", ROLE_COLUMNS));
        let mut separated = builder.separated(", ");
        for name in names {
            separated.push_bind(name);
        }
        separated.push_unseparated(")");

        let roles = builder
            .build_query_as::<Role>()
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    async fn create_role(&self, input: &CreateRoleInput) -> Result<Role> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, display_name, description, permissions, is_system_role, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, FALSE, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.display_name)
        .bind(input.description.as_deref().unwrap_or_default())
        .bind(Json(&input.permissions))
        .bind(input.sort_order.unwrap_or_default())
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create role")))
    }

    async fn update_role(&self, id: StringUuid, input: &UpdateRoleInput) -> Result<Role> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role {} not found", id)))?;

        let display_name = input.display_name.as_ref().unwrap_or(&existing.display_name);
        let description = input.description.as_ref().unwrap_or(&existing.description);
        let permissions = input.permissions.as_ref().unwrap_or(&existing.permissions);
        let sort_order = input.sort_order.unwrap_or(existing.sort_order);

        sqlx::query(
            r#"
            UPDATE roles
            SET display_name = ?, description = ?, permissions = ?, sort_order = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(display_name)
        .bind(description)
        .bind(Json(permissions))
        .bind(sort_order)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update role")))
    }

    async fn upsert(&self, role: &Role) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, display_name, description, permissions, is_system_role, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            ON DUPLICATE KEY UPDATE
                display_name = VALUES(display_name),
                description = VALUES(description),
                permissions = VALUES(permissions),
                is_system_role = VALUES(is_system_role),
                sort_order = VALUES(sort_order),
                updated_at = NOW()
            "#,
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.display_name)
        .bind(&role.description)
        .bind(Json(&role.permissions))
        .bind(role.is_system_role)
        .bind(role.sort_order)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
