//! Route table for the JSON API.

use crate::api::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

/// Builds the `/api` route tree.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(handlers::register))
        .route(
            "/users/:user_id/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/users/:user_id/transactions/export",
            get(handlers::export_transactions),
        )
        .route(
            "/users/:user_id/transactions/import",
            post(handlers::import_transactions),
        )
        .route(
            "/users/:user_id/transactions/:transaction_id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        .route(
            "/users/:user_id/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/users/:user_id/categories/:category_id",
            get(handlers::get_category).delete(handlers::delete_category),
        )
        .route(
            "/users/:user_id/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route(
            "/users/:user_id/budgets/:budget_id",
            put(handlers::update_budget).delete(handlers::delete_budget),
        )
        .route("/users/:user_id/alerts", get(handlers::budget_alerts))
        .route("/users/:user_id/statistics", get(handlers::statistics))
}
