//! Unified error types and result handling for `PocketLedger`.

use rust_decimal::Decimal;
use thiserror::Error;

/// All failure modes surfaced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what went wrong
        message: String,
    },

    /// Caller input was rejected before any mutation took place.
    #[error("{message}")]
    Validation {
        /// Human-readable description of the rejected input
        message: String,
    },

    /// A record was requested that does not exist or belongs to another user.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up (e.g. "category")
        entity: &'static str,
        /// Identifier used in the lookup
        id: String,
    },

    /// A monetary amount failed validation (zero, negative, or out of range).
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: Decimal,
    },

    /// An alert notification could not be handed to the delivery worker.
    #[error("Notification error: {message}")]
    Notification {
        /// Human-readable description of the delivery problem
        message: String,
    },

    /// Database error from the persistence layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (configuration files, CSV streams).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error during export.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Environment variable error during startup.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with a formatted message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
