//! Transaction business logic - create, update, delete, and list operations.
//!
//! Every write validates its input up front, persists the row, and then
//! invokes the explicit post-write hook sequence (evaluate budgets, log,
//! enqueue notifications, invalidate the statistics cache). There is no
//! hidden event bus: the hooks are an argument to the write operations, so
//! the path can be tested end to end without any live infrastructure.

use crate::{
    core::{alerts::TransactionHooks, category},
    entities::{transaction, user, Transaction, TransactionKind},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Caller input for creating or updating a transaction.
///
/// Exactly one of `category_id` / `new_category` must be given: either an
/// existing category owned by the same user, or a name to create on the
/// spot.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    /// Income or expense
    pub kind: TransactionKind,
    /// Positive amount, at most two fractional digits
    pub amount: Decimal,
    /// Calendar date the transaction applies to
    pub date: NaiveDate,
    /// Existing category id, owned by the same user
    pub category_id: Option<i64>,
    /// Name of a category to create on demand
    pub new_category: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

/// Creates a transaction for `owner` and runs the post-write hooks.
pub async fn create_transaction(
    db: &DatabaseConnection,
    hooks: &TransactionHooks,
    owner: &user::Model,
    input: NewTransaction,
) -> Result<transaction::Model> {
    validate_amount(input.amount)?;
    let category_id = resolve_category(db, owner.id, &input).await?;

    let model = transaction::ActiveModel {
        user_id: Set(owner.id),
        amount: Set(input.amount),
        date: Set(input.date),
        kind: Set(input.kind),
        category_id: Set(Some(category_id)),
        description: Set(input.description),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;

    hooks.after_write(db, owner, &created, true).await?;
    Ok(created)
}

/// Rewrites an existing transaction's fields and re-runs the hooks.
/// Updates never enqueue notifications; they do re-evaluate budgets for
/// logging and always invalidate the statistics cache.
pub async fn update_transaction(
    db: &DatabaseConnection,
    hooks: &TransactionHooks,
    owner: &user::Model,
    transaction_id: i64,
    input: NewTransaction,
) -> Result<transaction::Model> {
    validate_amount(input.amount)?;
    let existing = get_transaction(db, owner.id, transaction_id).await?;
    let category_id = resolve_category(db, owner.id, &input).await?;

    let mut active: transaction::ActiveModel = existing.into();
    active.amount = Set(input.amount);
    active.date = Set(input.date);
    active.kind = Set(input.kind);
    active.category_id = Set(Some(category_id));
    active.description = Set(input.description);
    let updated = active.update(db).await?;

    hooks.after_write(db, owner, &updated, false).await?;
    Ok(updated)
}

/// Deletes one of the user's transactions and invalidates their
/// statistics cache. No budget re-evaluation happens on delete; alerts are
/// always computed fresh on the next read or write.
pub async fn delete_transaction(
    db: &DatabaseConnection,
    hooks: &TransactionHooks,
    user_id: i64,
    transaction_id: i64,
) -> Result<()> {
    let existing = get_transaction(db, user_id, transaction_id).await?;
    existing.delete(db).await?;

    hooks.after_delete(user_id).await;
    Ok(())
}

/// Fetches a single transaction, scoped to the owning user.
pub async fn get_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<transaction::Model> {
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "transaction",
            id: transaction_id.to_string(),
        })
}

/// Lists the user's transactions, newest first (date desc, id desc).
pub async fn list_transactions(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO || amount.round_dp(2) != amount {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

async fn resolve_category(
    db: &DatabaseConnection,
    user_id: i64,
    input: &NewTransaction,
) -> Result<i64> {
    let new_name = input
        .new_category
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    match (input.category_id, new_name) {
        (Some(_), Some(_)) => Err(Error::validation(
            "Select either an existing category or create a new one, not both",
        )),
        (None, None) => Err(Error::validation(
            "A category must be selected or created",
        )),
        (Some(id), None) => category::get_category(db, user_id, id).await.map(|c| c.id),
        (None, Some(name)) => category::get_or_create_category(db, user_id, name)
            .await
            .map(|c| c.id),
    }
}
