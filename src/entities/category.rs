//! Category entity - Organizes transactions and anchors budget limits.
//!
//! Category names are unique per owning user; different users may reuse the
//! same name independently. The composite uniqueness is enforced by an index
//! created at schema setup and re-checked in the core layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: i64,
    /// Human-readable name (e.g. "Food", "Transport")
    pub name: String,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One category is referenced by many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One category anchors many budget limits
    #[sea_orm(has_many = "super::budget_limit::Entity")]
    BudgetLimits,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
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
