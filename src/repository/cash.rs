//! Cash balance repository

use crate::domain::{CashBalance, StringUuid};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CashRepository: Send + Sync {
    /// Balances of every yacht owned by the tenant, one row per currency.
    async fn list_by_tenant(&self, tenant_id: StringUuid) -> Result<Vec<CashBalance>>;
}

pub struct CashRepositoryImpl {
    pool: MySqlPool,
}

impl CashRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CashRepository for CashRepositoryImpl {
    async fn list_by_tenant(&self, tenant_id: StringUuid) -> Result<Vec<CashBalance>> {
        let balances = sqlx::query_as::<_, CashBalance>(
            r#"
            SELECT b.yacht_id, y.name AS yacht_name, b.currency_code, b.amount_minor
            FROM cash_balances b
            INNER JOIN yachts y ON y.id = b.yacht_id
            WHERE y.tenant_id = ?
            ORDER BY y.name, b.currency_code
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(balances)
    }
}
