//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record asked for a column the query did not return.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A column held a value of the wrong type for the record field.
    #[error("column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The blocking task running the query failed.
    #[error("background task failed: {0}")]
    Task(String),

    /// Schema bootstrap error.
    #[error("schema error: {0}")]
    Schema(String),

    /// Backend-specific query failure.
    #[error("query failed: {0}")]
    Query(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
