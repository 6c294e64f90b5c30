//! Transaction entity - Represents all recorded income and expenses.
//!
//! Each transaction has an owning `user_id`, a positive `amount` with two
//! fractional digits, a calendar `date`, a `kind` (income/expense), an
//! optional `category_id`, and a free-form `description`. Default listing
//! order is `(date desc, id desc)`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a transaction adds to or draws from the user's funds.
/// Stored as a lowercase string, matching the wire format of the CSV
/// import/export columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(7))")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in; never counts toward budget spending
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out; aggregated by the budget evaluator
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl TransactionKind {
    /// The lowercase wire label ("income" / "expense").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a wire label, ignoring case. Returns None for anything else.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: i64,
    /// Positive monetary amount, two fractional digits
    pub amount: Decimal,
    /// Calendar date the transaction applies to
    pub date: Date,
    /// Income or expense
    pub kind: TransactionKind,
    /// Category reference, cleared (not cascaded) when the category is deleted
    pub category_id: Option<i64>,
    /// Free-form description, may be empty
    pub description: String,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Optional link to the category the transaction is filed under
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
