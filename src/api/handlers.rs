//! Request handlers for the JSON API.
//!
//! Each handler resolves the owning user where the operation needs the
//! full account record, delegates to the core layer, and maps the result
//! straight to JSON. Error-to-status mapping lives on the crate error type.

use crate::{
    api::AppState,
    core::{account, budget, category, csv, stats, transaction},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

/// Body of a category creation request.
#[derive(Debug, Deserialize)]
pub struct NewCategory {
    /// Name of the category to create
    pub name: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(input): Json<account::NewUser>,
) -> Result<impl IntoResponse> {
    let user =
        account::register_user(&state.db, input, &state.settings.default_categories).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let transactions = transaction::list_transactions(&state.db, user_id).await?;
    Ok(Json(transactions))
}

pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(input): Json<transaction::NewTransaction>,
) -> Result<impl IntoResponse> {
    let owner = account::get_user(&state.db, user_id).await?;
    let created = transaction::create_transaction(&state.db, &state.hooks, &owner, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path((user_id, transaction_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let found = transaction::get_transaction(&state.db, user_id, transaction_id).await?;
    Ok(Json(found))
}

pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path((user_id, transaction_id)): Path<(i64, i64)>,
    Json(input): Json<transaction::NewTransaction>,
) -> Result<impl IntoResponse> {
    let owner = account::get_user(&state.db, user_id).await?;
    let updated =
        transaction::update_transaction(&state.db, &state.hooks, &owner, transaction_id, input)
            .await?;
    Ok(Json(updated))
}

pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path((user_id, transaction_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    transaction::delete_transaction(&state.db, &state.hooks, user_id, transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let categories = category::list_categories(&state.db, user_id).await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(input): Json<NewCategory>,
) -> Result<impl IntoResponse> {
    account::get_user(&state.db, user_id).await?;
    let created = category::create_category(&state.db, user_id, &input.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path((user_id, category_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let found = category::get_category(&state.db, user_id, category_id).await?;
    Ok(Json(found))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path((user_id, category_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    category::delete_category(&state.db, user_id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let budgets = budget::list_budget_limits(&state.db, user_id).await?;
    Ok(Json(budgets))
}

pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(input): Json<budget::NewBudgetLimit>,
) -> Result<impl IntoResponse> {
    account::get_user(&state.db, user_id).await?;
    let created = budget::create_budget_limit(&state.db, user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Path((user_id, budget_id)): Path<(i64, i64)>,
    Json(input): Json<budget::NewBudgetLimit>,
) -> Result<impl IntoResponse> {
    let updated = budget::update_budget_limit(&state.db, user_id, budget_id, input).await?;
    Ok(Json(updated))
}

pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path((user_id, budget_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    budget::delete_budget_limit(&state.db, user_id, budget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn budget_alerts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    account::get_user(&state.db, user_id).await?;
    let alerts = budget::evaluate_budgets(&state.db, user_id).await?;
    Ok(Json(alerts))
}

pub async fn statistics(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    account::get_user(&state.db, user_id).await?;
    let snapshot = stats::get_statistics(&state.db, &state.cache, user_id).await?;
    Ok(Json(snapshot))
}

pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    account::get_user(&state.db, user_id).await?;
    let body = csv::export_transactions(&state.db, user_id).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        body,
    ))
}

pub async fn import_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    body: String,
) -> Result<impl IntoResponse> {
    let owner = account::get_user(&state.db, user_id).await?;
    let report =
        csv::import_transactions(&state.db, &state.hooks, &owner, body.as_bytes()).await?;
    Ok(Json(report))
}
