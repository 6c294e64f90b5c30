//! User entity - Represents an account identity.
//!
//! Each user owns their categories, transactions, and budget limits; every
//! query in the core layer is filtered by the owning user id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across the system
    #[sea_orm(unique)]
    pub username: String,
    /// Contact address for budget alert delivery, None when not on file
    pub email: Option<String>,
    /// When the account was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    /// One user owns many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One user owns many budget limits
    #[sea_orm(has_many = "super::budget_limit::Entity")]
    BudgetLimits,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budget_limit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetLimits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
