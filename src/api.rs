//! JSON API surface - thin axum handlers mirroring the CRUD operations.
//!
//! Handlers decode the request, call into [`crate::core`], and encode the
//! result; no business rules live here. Users are addressed by path id;
//! session handling is outside this crate's scope.

/// Request handlers and their DTOs
pub(crate) mod handlers;
/// Route table
pub mod routes;

use crate::{
    cache::StatsCache, config::settings::AppSettings, core::alerts::TransactionHooks,
    errors::Error,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Application state shared across handlers.
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Per-user statistics cache
    pub cache: Arc<StatsCache>,
    /// Post-write hook bundle for the transaction endpoints
    pub hooks: TransactionHooks,
    /// Settings loaded at startup (default categories etc.)
    pub settings: AppSettings,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation { .. } | Self::InvalidAmount { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
