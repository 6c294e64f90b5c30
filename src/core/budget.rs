//! Budget limit business logic - CRUD operations and the budget evaluator.
//!
//! A budget limit is a per-category spending ceiling evaluated against the
//! current period window. The evaluator joins each of a user's limits with
//! the matching expense transactions since the window start and derives a
//! [`BudgetAlert`] for every limit with non-zero spend. Alerts are computed
//! on demand and never persisted; they go stale as soon as new transactions
//! arrive, which is why the statistics cache is keyed per user and
//! invalidated on every write.

use crate::{
    core::period::period_start,
    entities::{budget_limit, transaction, BudgetLimit, Category, Period, Transaction, TransactionKind},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Derived spend-vs-limit status for one budget in its current period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAlert {
    /// Name of the category the limit applies to
    pub category: String,
    /// Total expense amount in the current period window
    pub spent: Decimal,
    /// The configured ceiling
    pub limit: Decimal,
    /// Human-readable period label ("Daily" / "Weekly" / "Monthly")
    pub period: String,
    /// `spent / limit * 100`, rounded to one decimal place
    pub percentage: Decimal,
    /// True once spending reaches 80% of the limit
    pub is_warning: bool,
    /// True once spending reaches or passes the limit
    pub is_exceeded: bool,
}

/// Caller input for creating or updating a budget limit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudgetLimit {
    /// Category the limit applies to; must belong to the same user
    pub category_id: i64,
    /// Positive spending ceiling
    pub limit_amount: Decimal,
    /// Evaluation window granularity
    pub period: Period,
}

/// Creates a new budget limit for `user_id`, enforcing the one-limit-per
/// (category, period) rule and rejecting non-positive ceilings.
pub async fn create_budget_limit(
    db: &DatabaseConnection,
    user_id: i64,
    input: NewBudgetLimit,
) -> Result<budget_limit::Model> {
    validate_limit(db, user_id, &input, None).await?;

    let limit = budget_limit::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(input.category_id),
        limit_amount: Set(input.limit_amount),
        period: Set(input.period),
        ..Default::default()
    };

    limit.insert(db).await.map_err(Into::into)
}

/// Replaces the category, ceiling, and period of an existing limit.
/// The uniqueness check excludes the limit being edited.
pub async fn update_budget_limit(
    db: &DatabaseConnection,
    user_id: i64,
    limit_id: i64,
    input: NewBudgetLimit,
) -> Result<budget_limit::Model> {
    let existing = get_budget_limit(db, user_id, limit_id).await?;
    validate_limit(db, user_id, &input, Some(limit_id)).await?;

    let mut active: budget_limit::ActiveModel = existing.into();
    active.category_id = Set(input.category_id);
    active.limit_amount = Set(input.limit_amount);
    active.period = Set(input.period);
    active.update(db).await.map_err(Into::into)
}

/// Deletes one of the user's budget limits.
pub async fn delete_budget_limit(
    db: &DatabaseConnection,
    user_id: i64,
    limit_id: i64,
) -> Result<()> {
    let limit = get_budget_limit(db, user_id, limit_id).await?;
    limit.delete(db).await?;
    Ok(())
}

/// Fetches a single budget limit, scoped to the owning user.
pub async fn get_budget_limit(
    db: &DatabaseConnection,
    user_id: i64,
    limit_id: i64,
) -> Result<budget_limit::Model> {
    BudgetLimit::find_by_id(limit_id)
        .filter(budget_limit::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "budget limit",
            id: limit_id.to_string(),
        })
}

/// Lists all of the user's budget limits in id order.
pub async fn list_budget_limits(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<budget_limit::Model>> {
    BudgetLimit::find()
        .filter(budget_limit::Column::UserId.eq(user_id))
        .order_by_asc(budget_limit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn validate_limit(
    db: &DatabaseConnection,
    user_id: i64,
    input: &NewBudgetLimit,
    exclude_id: Option<i64>,
) -> Result<()> {
    if input.limit_amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: input.limit_amount,
        });
    }

    let category = Category::find_by_id(input.category_id)
        .filter(crate::entities::category::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "category",
            id: input.category_id.to_string(),
        })?;

    let mut duplicates = BudgetLimit::find()
        .filter(budget_limit::Column::UserId.eq(user_id))
        .filter(budget_limit::Column::CategoryId.eq(input.category_id))
        .filter(budget_limit::Column::Period.eq(input.period));
    if let Some(id) = exclude_id {
        duplicates = duplicates.filter(budget_limit::Column::Id.ne(id));
    }

    if duplicates.count(db).await? > 0 {
        return Err(Error::validation(format!(
            "A {} limit for category '{}' already exists; edit the existing limit instead",
            input.period.label().to_lowercase(),
            category.name
        )));
    }

    Ok(())
}

/// Evaluates all of the user's budget limits against the current period
/// windows, as of today (UTC).
pub async fn evaluate_budgets(db: &DatabaseConnection, user_id: i64) -> Result<Vec<BudgetAlert>> {
    evaluate_budgets_as_of(db, user_id, Utc::now().date_naive()).await
}

/// Evaluates budgets with an explicit reference date.
///
/// One alert is produced per limit with non-zero expense spend inside its
/// window; limits with no spending are skipped entirely. Alerts follow the
/// id order of the underlying limits. Data-store errors propagate to the
/// caller uninterpreted.
pub async fn evaluate_budgets_as_of(
    db: &DatabaseConnection,
    user_id: i64,
    today: NaiveDate,
) -> Result<Vec<BudgetAlert>> {
    let limits = BudgetLimit::find()
        .filter(budget_limit::Column::UserId.eq(user_id))
        .order_by_asc(budget_limit::Column::Id)
        .find_also_related(Category)
        .all(db)
        .await?;

    let mut alerts = Vec::new();
    for (limit, category) in limits {
        let category = category.ok_or_else(|| Error::NotFound {
            entity: "category",
            id: limit.category_id.to_string(),
        })?;

        let start = period_start(limit.period, today);
        let spent = spent_since(db, user_id, limit.category_id, start).await?;
        if spent <= Decimal::ZERO {
            continue;
        }

        // limit_amount > 0 is guaranteed at creation; no division-by-zero path.
        let percentage = (spent / limit.limit_amount * Decimal::from(100)).round_dp(1);
        alerts.push(BudgetAlert {
            category: category.name,
            spent,
            limit: limit.limit_amount,
            period: limit.period.label().to_string(),
            percentage,
            is_warning: percentage >= Decimal::from(80),
            is_exceeded: spent >= limit.limit_amount,
        });
    }

    Ok(alerts)
}

/// Sums the user's expense transactions in one category from `start`
/// onwards. Missing rows count as zero.
async fn spent_since(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    start: NaiveDate,
) -> Result<Decimal> {
    let total: Option<Option<Decimal>> = Transaction::find()
        .select_only()
        .column_as(transaction::Column::Amount.sum(), "total")
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::CategoryId.eq(category_id))
        .filter(transaction::Column::Kind.eq(TransactionKind::Expense))
        .filter(transaction::Column::Date.gte(start))
        .into_tuple()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(Decimal::ZERO))
}
