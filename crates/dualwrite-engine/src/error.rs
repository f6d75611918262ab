//! Error types for the engine module.

use thiserror::Error;

/// Errors that can occur while reading from the authorization engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected or failed the read.
    #[error("read failed: {0}")]
    Read(String),

    /// A continuation token the engine did not issue.
    #[error("invalid continuation token: {0:?}")]
    InvalidToken(String),

    /// Pagination did not terminate within the configured page budget.
    #[error("pagination for {object}#{relation} exceeded {pages} pages")]
    PaginationLimit {
        object: String,
        relation: String,
        pages: usize,
    },

    /// A stored tuple could not be decoded.
    #[error("tuple error: {0}")]
    Tuple(#[from] dualwrite_core::TupleError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
