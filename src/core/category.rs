//! Category business logic - per-user category management.
//!
//! Category names are unique within one user and freely reusable across
//! users. Deletion detaches the category from its transactions (their
//! reference is cleared, the rows survive) and cascades to its budget
//! limits, all inside one database transaction.

use crate::{
    entities::{budget_limit, category, transaction, BudgetLimit, Category, Transaction},
    errors::{Error, Result},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};

/// Creates a category for `user_id`, rejecting blank and duplicate names.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }

    if find_by_name(db, user_id, name).await?.is_some() {
        return Err(Error::validation(format!(
            "You already have a category named '{name}'"
        )));
    }

    let model = category::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Returns the user's category with this name, creating it when absent.
/// Used by the CSV import and the new-category transaction path.
pub async fn get_or_create_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<category::Model> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }

    match find_by_name(db, user_id, trimmed).await? {
        Some(existing) => Ok(existing),
        None => create_category(db, user_id, trimmed).await,
    }
}

/// Fetches a single category, scoped to the owning user.
pub async fn get_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<category::Model> {
    Category::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "category",
            id: category_id.to_string(),
        })
}

/// Lists the user's categories alphabetically.
pub async fn list_categories(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a category: transactions keep their rows with the reference
/// cleared, budget limits anchored to the category are removed, and all of
/// it commits atomically.
pub async fn delete_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<()> {
    let category = get_category(db, user_id, category_id).await?;

    let txn = db.begin().await?;

    Transaction::update_many()
        .col_expr(transaction::Column::CategoryId, Expr::value(Option::<i64>::None))
        .filter(transaction::Column::CategoryId.eq(category.id))
        .exec(&txn)
        .await?;

    BudgetLimit::delete_many()
        .filter(budget_limit::Column::CategoryId.eq(category.id))
        .exec(&txn)
        .await?;

    category.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

pub(crate) async fn find_by_name(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Period;
    use crate::test_utils::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_duplicate_name_same_user_rejected() -> Result<()> {
        let (db, user, _food) = setup_with_category().await?;

        let result = create_category(&db, user.id, "Food").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_same_name_different_users_allowed() -> Result<()> {
        let (db, _user, _food) = setup_with_category().await?;
        let other = create_test_user(&db, "other").await?;

        let category = create_category(&db, other.id, "Food").await?;
        assert_eq!(category.name, "Food");
        assert_eq!(category.user_id, other.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_names_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "testuser").await?;

        for bad in ["", "   "] {
            let result = create_category(&db, user.id, bad).await;
            assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "testuser").await?;

        let first = get_or_create_category(&db, user.id, "Travel").await?;
        let second = get_or_create_category(&db, user.id, "Travel").await?;
        assert_eq!(first.id, second.id);

        let all = list_categories(&db, user.id).await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_listing_is_alphabetical() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "testuser").await?;
        create_category(&db, user.id, "Transport").await?;
        create_category(&db, user.id, "Food").await?;
        create_category(&db, user.id, "Entertainment").await?;

        let names: Vec<String> = list_categories(&db, user.id)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Entertainment", "Food", "Transport"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_detaches_transactions_and_cascades_limits() -> Result<()> {
        let (db, user, food) = setup_with_category().await?;
        create_test_budget(&db, user.id, food.id, "100.00", Period::Month).await?;
        let tx = insert_expense(
            &db,
            user.id,
            Some(food.id),
            "25.00",
            Utc::now().date_naive(),
        )
        .await?;

        delete_category(&db, user.id, food.id).await?;

        // The transaction survives with its reference cleared.
        let survivor = Transaction::find_by_id(tx.id).one(&db).await?.unwrap();
        assert_eq!(survivor.category_id, None);

        // The budget limit is gone with its anchor.
        let limits = BudgetLimit::find()
            .filter(budget_limit::Column::UserId.eq(user.id))
            .all(&db)
            .await?;
        assert!(limits.is_empty());

        let result = get_category(&db, user.id, food.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_scoped_to_owner() -> Result<()> {
        let (db, _user, food) = setup_with_category().await?;
        let other = create_test_user(&db, "other").await?;

        let result = delete_category(&db, other.id, food.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }
}
