//! Tenant business logic

use crate::config::TenancyConfig;
use crate::domain::{CreateTenantInput, StringUuid, Tenant, UpdateTenantStatusInput};
use crate::error::{AppError, Result};
use crate::repository::TenantRepository;
use std::sync::Arc;
use validator::Validate;

pub struct TenantService<R: TenantRepository> {
    repo: Arc<R>,
    tenancy: TenancyConfig,
}

impl<R: TenantRepository> TenantService<R> {
    pub fn new(repo: Arc<R>, tenancy: TenancyConfig) -> Self {
        Self { repo, tenancy }
    }

    /// Repository used by request-time tenant resolution
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub async fn create(&self, input: CreateTenantInput) -> Result<Tenant> {
        input.validate()?;

        // A reserved label could never be reached by subdomain.
        if self.tenancy.is_reserved_label(&input.subdomain) {
            return Err(AppError::BadRequest(format!(
                "Subdomain '{}' is reserved",
                input.subdomain
            )));
        }

        if self.repo.find_by_subdomain(&input.subdomain).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Tenant with subdomain '{}' already exists",
                input.subdomain
            )));
        }

        let tenant = self.repo.create(&input).await?;
        tracing::info!(tenant_id = %tenant.id, subdomain = %tenant.subdomain, "Tenant created");
        Ok(tenant)
    }

    pub async fn get(&self, id: StringUuid) -> Result<Tenant> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tenant {} not found", id)))
    }

    /// Look up the tenant named by a request context.
    ///
    /// Header-supplied ids are never validated at resolution time, so a
    /// malformed id is reported the same way as an unknown one.
    pub async fn get_by_context_id(&self, raw_id: &str) -> Result<Tenant> {
        let id = StringUuid::parse_str(raw_id)
            .map_err(|_| AppError::NotFound(format!("Tenant {} not found", raw_id)))?;
        self.get(id).await
    }

    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<Tenant>, i64)> {
        let offset = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(per_page))
            .ok_or_else(|| AppError::BadRequest("Page out of range".to_string()))?;
        let tenants = self.repo.list(offset, per_page).await?;
        let total = self.repo.count().await?;
        Ok((tenants, total))
    }

    pub async fn update_status(
        &self,
        id: StringUuid,
        input: UpdateTenantStatusInput,
    ) -> Result<Tenant> {
        let tenant = self.repo.update_status(id, &input).await?;
        tracing::info!(tenant_id = %id, status = %tenant.status, "Tenant status changed");
        Ok(tenant)
    }
}
