//! Shared test utilities for `PocketLedger`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test records with sensible defaults.

use crate::{
    cache::StatsCache,
    core::alerts::TransactionHooks,
    entities::{budget_limit, category, transaction, user, Period, TransactionKind},
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a decimal literal. Panics on malformed input, which in a test
/// means the test itself is wrong.
#[must_use]
pub fn dec(value: &str) -> Decimal {
    value.parse().expect("literal decimal")
}

/// Creates a test user with a derived contact address
/// (`<username>@example.com`).
pub async fn create_test_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    create_custom_user(db, username, Some(&format!("{username}@example.com"))).await
}

/// Creates a test user with an explicit (possibly absent) contact address.
pub async fn create_custom_user(
    db: &DatabaseConnection,
    username: &str,
    email: Option<&str>,
) -> Result<user::Model> {
    let model = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.map(String::from)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a category through the core layer, so uniqueness rules apply.
pub async fn create_test_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<category::Model> {
    crate::core::category::create_category(db, user_id, name).await
}

/// Creates a budget limit through the core layer.
pub async fn create_test_budget(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    limit_amount: &str,
    period: Period,
) -> Result<budget_limit::Model> {
    crate::core::budget::create_budget_limit(
        db,
        user_id,
        crate::core::budget::NewBudgetLimit {
            category_id,
            limit_amount: dec(limit_amount),
            period,
        },
    )
    .await
}

/// Inserts an expense row directly, bypassing validation and hooks.
/// Use this to stage data for evaluator and statistics tests.
pub async fn insert_expense(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: Option<i64>,
    amount: &str,
    date: NaiveDate,
) -> Result<transaction::Model> {
    insert_transaction(db, user_id, category_id, amount, date, TransactionKind::Expense).await
}

/// Inserts an income row directly, bypassing validation and hooks.
pub async fn insert_income(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: Option<i64>,
    amount: &str,
    date: NaiveDate,
) -> Result<transaction::Model> {
    insert_transaction(db, user_id, category_id, amount, date, TransactionKind::Income).await
}

async fn insert_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: Option<i64>,
    amount: &str,
    date: NaiveDate,
    kind: TransactionKind,
) -> Result<transaction::Model> {
    let model = transaction::ActiveModel {
        user_id: Set(user_id),
        amount: Set(dec(amount)),
        date: Set(date),
        kind: Set(kind),
        category_id: Set(category_id),
        description: Set("Test transaction".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Hooks wired to a throwaway cache and no notification queue.
#[must_use]
pub fn noop_hooks() -> TransactionHooks {
    TransactionHooks::new(Arc::new(StatsCache::default()), None)
}

/// Sets up a complete test environment with a user and one category.
/// Returns (db, user "testuser", category "Food") for common scenarios.
pub async fn setup_with_category()
-> Result<(DatabaseConnection, user::Model, category::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "testuser").await?;
    let category = create_test_category(&db, user.id, "Food").await?;
    Ok((db, user, category))
}
