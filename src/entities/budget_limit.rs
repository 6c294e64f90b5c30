//! Budget limit entity - A per-category spending ceiling for one user.
//!
//! A user may hold at most one limit per `(category, period)` pair; the
//! triple `(user_id, category_id, period)` is unique. Deleting the anchor
//! category deletes its limits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The recurring window a limit is evaluated against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(5))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Period {
    /// Evaluated against today's spending only
    #[sea_orm(string_value = "DAY")]
    Day,
    /// Evaluated from the Monday of the current week
    #[sea_orm(string_value = "WEEK")]
    Week,
    /// Evaluated from the first day of the current month
    #[sea_orm(string_value = "MONTH")]
    Month,
}

impl Period {
    /// Human-readable label used in alert messages ("Daily" / "Weekly" / "Monthly").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "Daily",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
        }
    }

    /// Parses the stored representation ("DAY" / "WEEK" / "MONTH"), ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DAY" => Some(Self::Day),
            "WEEK" => Some(Self::Week),
            "MONTH" => Some(Self::Month),
            _ => None,
        }
    }
}

/// Budget limit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_limits")]
pub struct Model {
    /// Unique identifier for the limit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: i64,
    /// The category this limit applies to (required)
    pub category_id: i64,
    /// Positive spending ceiling for one period window
    pub limit_amount: Decimal,
    /// Granularity of the evaluation window
    pub period: Period,
}

/// Defines relationships between BudgetLimit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each limit belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each limit is anchored to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
