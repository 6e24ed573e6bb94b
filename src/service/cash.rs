//! Cash balance reporting

use crate::domain::{summarize_by_currency, CashBalance, CurrencyTotal, StringUuid};
use crate::error::{AppError, Result};
use crate::repository::CashRepository;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct CashSummary {
    pub balances: Vec<CashBalance>,
    pub totals: Vec<CurrencyTotal>,
}

pub struct CashService<C: CashRepository> {
    repo: Arc<C>,
}

impl<C: CashRepository> CashService<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    /// Balances of the tenant's yachts with per-currency totals.
    ///
    /// A tenant id that is not a UUID cannot own any yacht and yields an
    /// empty summary.
    pub async fn summary(&self, tenant_id: &str) -> Result<CashSummary> {
        let balances = match StringUuid::parse_str(tenant_id) {
            Ok(id) => self.repo.list_by_tenant(id).await?,
            Err(_) => Vec::new(),
        };
        let totals = summarize_by_currency(&balances);
        Ok(CashSummary { balances, totals })
    }

    /// Balances for one currency code; unknown codes are rejected.
    pub async fn summary_for_currency(
        &self,
        tenant_id: &str,
        currency: &str,
    ) -> Result<CashSummary> {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::BadRequest(format!(
                "Invalid currency code '{}'",
                currency
            )));
        }

        let mut summary = self.summary(tenant_id).await?;
        summary
            .balances
            .retain(|b| b.currency_code.eq_ignore_ascii_case(currency));
        summary.totals = summarize_by_currency(&summary.balances);
        Ok(summary)
    }
}
