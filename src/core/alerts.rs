//! Alert dispatch - the explicit post-write hook sequence.
//!
//! The transaction write path calls into [`TransactionHooks`] after each
//! persisted create, update, or delete. The sequence for expense writes is:
//! evaluate the owner's budgets, log every exceeded limit, enqueue one
//! notification per exceeded limit (creations only, and only when the user
//! has a contact address on file), then invalidate the owner's statistics
//! cache. Deletes only invalidate the cache; evaluation is always computed
//! fresh, never incrementally.
//!
//! The hooks are stateless between invocations and carry no ordering
//! dependency between different transactions.

use crate::{
    cache::StatsCache,
    core::budget::evaluate_budgets,
    entities::{transaction, user, TransactionKind},
    errors::Result,
    notify::{AlertMessage, NotificationSender},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::warn;

/// Side-effect collaborators for the transaction write path.
#[derive(Clone)]
pub struct TransactionHooks {
    cache: Arc<StatsCache>,
    notifier: Option<NotificationSender>,
}

impl TransactionHooks {
    /// Bundles the statistics cache with an optional notification queue.
    /// Without a notifier, exceeded budgets are still logged but nothing
    /// is enqueued.
    #[must_use]
    pub fn new(cache: Arc<StatsCache>, notifier: Option<NotificationSender>) -> Self {
        Self { cache, notifier }
    }

    /// Fired once per persisted transaction create or update.
    ///
    /// Never blocks on delivery: notifications are handed to the queue and
    /// delivered out of band. An error from here means the data store
    /// itself failed during evaluation; the triggering write has already
    /// committed.
    pub async fn after_write(
        &self,
        db: &DatabaseConnection,
        owner: &user::Model,
        written: &transaction::Model,
        created: bool,
    ) -> Result<()> {
        if written.kind == TransactionKind::Expense {
            let alerts = evaluate_budgets(db, owner.id).await?;
            for alert in alerts.iter().filter(|a| a.is_exceeded) {
                warn!(
                    user = %owner.username,
                    category = %alert.category,
                    spent = %alert.spent,
                    limit = %alert.limit,
                    "budget limit exceeded"
                );

                if created {
                    self.enqueue_alert(owner, alert);
                }
            }
        }

        // The snapshot is stale after any write, income included.
        self.cache.invalidate_user(owner.id).await;
        Ok(())
    }

    /// Fired once per deleted transaction.
    pub async fn after_delete(&self, user_id: i64) {
        self.cache.invalidate_user(user_id).await;
    }

    fn enqueue_alert(&self, owner: &user::Model, alert: &crate::core::budget::BudgetAlert) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let Some(email) = owner.email.as_deref().filter(|e| !e.is_empty()) else {
            return;
        };

        notifier.enqueue(AlertMessage {
            recipient: email.to_string(),
            display_name: owner.username.clone(),
            alert: alert.clone(),
        });
    }
}
