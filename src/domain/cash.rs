//! Yacht cash balances

use super::common::StringUuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// Balance of one currency held aboard one yacht.
///
/// Amounts are integer minor units (cents) so totals never lose precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CashBalance {
    pub yacht_id: StringUuid,
    pub yacht_name: String,
    pub currency_code: String,
    pub amount_minor: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyTotal {
    pub currency_code: String,
    pub amount_minor: i64,
    pub yacht_count: usize,
}

/// Sum balances per currency code, ordered by code.
///
/// Codes are compared case-insensitively and reported uppercase.
pub fn summarize_by_currency(balances: &[CashBalance]) -> Vec<CurrencyTotal> {
    let mut totals: BTreeMap<String, (i64, usize)> = BTreeMap::new();
    for balance in balances {
        let entry = totals
            .entry(balance.currency_code.to_uppercase())
            .or_insert((0, 0));
        entry.0 = entry.0.saturating_add(balance.amount_minor);
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(currency_code, (amount_minor, yacht_count))| CurrencyTotal {
            currency_code,
            amount_minor,
            yacht_count,
        })
        .collect()
}
