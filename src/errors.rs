//! Unified error types for the finance and school services.
//!
//! Every failure surfaced by the core layer is one of these variants. The HTTP
//! layer maps each variant to a status code in one place (`api::error`).

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// A required field is missing or malformed
    #[error("{message}")]
    Validation {
        /// Human-readable explanation returned to the client
        message: String,
    },

    /// Amount is zero, negative, or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// The referenced row does not exist
    #[error("{entity} not found")]
    NotFound {
        /// Kind of row that was looked up (e.g. `"Expense"`)
        entity: &'static str,
    },

    /// A natural key or uniqueness rule was violated
    #[error("{message}")]
    Conflict {
        /// Description of the conflicting row
        message: String,
    },

    /// Username exists but the password did not match
    #[error("Wrong password")]
    InvalidCredentials,

    /// Password hashing or hash parsing failed
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Message from the hashing backend
        message: String,
    },

    /// Any other failure talking to the store
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure (socket bind, config file read)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Converts a store error into [`Error::Conflict`] when it is a unique
    /// constraint violation, keeping every other error as [`Error::Database`].
    #[must_use]
    pub fn conflict_on_unique(err: DbErr, message: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict {
                message: message.into(),
            },
            _ => Self::Database(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
