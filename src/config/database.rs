//! Database configuration module for `PocketLedger`.
//!
//! This module handles `SQLite` database connection and table creation
//! using `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the
//! Rust struct definitions; the composite uniqueness rules that the derive
//! macros cannot express are added as unique indexes alongside.

use crate::entities::{budget_limit, category, BudgetLimit, Category, Transaction, User};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, Schema,
    sea_query::Index,
};

/// Gets the database URL from the environment or returns the default
/// local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/pocketledger.sqlite?mode=rwc".to_string())
}

/// Establishes a connection using `DATABASE_URL`, falling back to a local
/// `SQLite` file when the variable is not set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables and unique indexes. Idempotent; safe to run on
/// every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut category_table = schema.create_table_from_entity(Category);
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    let mut budget_limit_table = schema.create_table_from_entity(BudgetLimit);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(category_table.if_not_exists())).await?;
    db.execute(builder.build(transaction_table.if_not_exists())).await?;
    db.execute(builder.build(budget_limit_table.if_not_exists())).await?;

    // (user, name) unique per category; (user, category, period) unique per limit.
    let category_unique = Index::create()
        .name("idx_categories_user_name")
        .table(Category)
        .col(category::Column::UserId)
        .col(category::Column::Name)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&category_unique)).await?;

    let budget_unique = Index::create()
        .name("idx_budget_limits_user_category_period")
        .table(BudgetLimit)
        .col(budget_limit::Column::UserId)
        .col(budget_limit::Column::CategoryId)
        .col(budget_limit::Column::Period)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&budget_unique)).await?;

    Ok(())
}
