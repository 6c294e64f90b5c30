//! Account registration and default-category provisioning.
//!
//! Provisioning the starter categories is an explicit step of the
//! registration workflow rather than a side effect of the persistence
//! layer: the dependency is visible here and testable without simulating
//! storage events. Provisioning is idempotent; re-running it never
//! duplicates a name.

use crate::{
    core::category,
    entities::{user, User},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Caller input for registering a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Desired login name, unique across the system
    pub username: String,
    /// Contact address for alert delivery; empty strings are treated as absent
    pub email: Option<String>,
}

/// Registers a new account and provisions its starter categories.
pub async fn register_user(
    db: &DatabaseConnection,
    input: NewUser,
    default_categories: &[String],
) -> Result<user::Model> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }

    let taken = User::find()
        .filter(user::Column::Username.eq(username))
        .count(db)
        .await?;
    if taken > 0 {
        return Err(Error::validation(format!(
            "Username '{username}' is already taken"
        )));
    }

    let email = input
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    let model = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;

    let provisioned = provision_default_categories(db, created.id, default_categories).await?;
    info!(
        user = %created.username,
        provisioned,
        "registered user with starter categories"
    );

    Ok(created)
}

/// Ensures each of `names` exists as a category for `user_id`, creating the
/// missing ones. Returns how many were created.
pub async fn provision_default_categories(
    db: &DatabaseConnection,
    user_id: i64,
    names: &[String],
) -> Result<usize> {
    let mut created = 0;
    for name in names {
        if category::find_by_name(db, user_id, name.trim()).await?.is_none() {
            category::create_category(db, user_id, name).await?;
            created += 1;
        }
    }
    Ok(created)
}

/// Fetches a user by id.
pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::category::list_categories;
    use crate::test_utils::*;

    fn defaults() -> Vec<String> {
        ["Food", "Transport", "Utilities", "Entertainment"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[tokio::test]
    async fn test_registration_provisions_default_categories() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(
            &db,
            NewUser {
                username: "newuser".to_string(),
                email: Some("new@example.com".to_string()),
            },
            &defaults(),
        )
        .await?;

        let names: Vec<String> = list_categories(&db, user.id)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec!["Entertainment", "Food", "Transport", "Utilities"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_provisioning_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "testuser").await?;

        let first = provision_default_categories(&db, user.id, &defaults()).await?;
        assert_eq!(first, 4);
        let second = provision_default_categories(&db, user.id, &defaults()).await?;
        assert_eq!(second, 0);

        assert_eq!(list_categories(&db, user.id).await?.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "taken").await?;

        let result = register_user(
            &db,
            NewUser {
                username: "taken".to_string(),
                email: None,
            },
            &defaults(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_email_is_stored_as_absent() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(
            &db,
            NewUser {
                username: "quiet".to_string(),
                email: Some("   ".to_string()),
            },
            &defaults(),
        )
        .await?;
        assert_eq!(user.email, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_two_users_can_share_default_category_names() -> Result<()> {
        let db = setup_test_db().await?;

        let alice = register_user(
            &db,
            NewUser {
                username: "alice".to_string(),
                email: None,
            },
            &defaults(),
        )
        .await?;
        let bob = register_user(
            &db,
            NewUser {
                username: "bob".to_string(),
                email: None,
            },
            &defaults(),
        )
        .await?;

        assert_eq!(list_categories(&db, alice.id).await?.len(), 4);
        assert_eq!(list_categories(&db, bob.id).await?.len(), 4);

        Ok(())
    }
}
