//! Monthly statistics aggregation behind the per-user cache.
//!
//! The snapshot groups the user's transactions by calendar month and sums
//! income and expense separately, zero-filling months where only one kind
//! occurred. Reads go through the statistics cache; the write and delete
//! hooks invalidate the entry, so a stale snapshot lives at most one cache
//! TTL.

use crate::{
    cache::StatsCache,
    entities::{transaction, Transaction, TransactionKind},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregated monthly totals for one user.
///
/// `months` holds `YYYY-MM` labels in ascending order; `income[i]` and
/// `expense[i]` are the totals for `months[i]`, zero when that kind had no
/// transactions in the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Month labels, ascending
    pub months: Vec<String>,
    /// Per-month income totals
    pub income: Vec<Decimal>,
    /// Per-month expense totals
    pub expense: Vec<Decimal>,
}

/// Returns the user's statistics snapshot, serving from the cache when a
/// fresh entry exists and recomputing (then re-caching) otherwise.
pub async fn get_statistics(
    db: &DatabaseConnection,
    cache: &StatsCache,
    user_id: i64,
) -> Result<StatsSnapshot> {
    let key = StatsCache::stats_key(user_id);

    if let Some(value) = cache.get(&key).await {
        if let Ok(snapshot) = serde_json::from_value(value) {
            debug!(user_id, "statistics served from cache");
            return Ok(snapshot);
        }
    }

    let snapshot = compute_statistics(db, user_id).await?;
    if let Ok(value) = serde_json::to_value(&snapshot) {
        cache.set(key, value).await;
    }
    Ok(snapshot)
}

/// Computes the snapshot directly from the data store.
pub async fn compute_statistics(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<StatsSnapshot> {
    let rows = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    let mut income: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut expense: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        let month = row.date.format("%Y-%m").to_string();
        let bucket = match row.kind {
            TransactionKind::Income => &mut income,
            TransactionKind::Expense => &mut expense,
        };
        *bucket.entry(month).or_insert(Decimal::ZERO) += row.amount;
    }

    // BTreeMap keys are already sorted; the union preserves that order.
    let mut months: Vec<String> = income.keys().chain(expense.keys()).cloned().collect();
    months.sort();
    months.dedup();

    let income_totals = months
        .iter()
        .map(|m| income.get(m).copied().unwrap_or(Decimal::ZERO))
        .collect();
    let expense_totals = months
        .iter()
        .map(|m| expense.get(m).copied().unwrap_or(Decimal::ZERO))
        .collect();

    Ok(StatsSnapshot {
        months,
        income: income_totals,
        expense: expense_totals,
    })
}
