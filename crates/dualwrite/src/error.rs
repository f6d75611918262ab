//! Error types for the collectors.

use dualwrite_engine::EngineError;
use dualwrite_store::StoreError;
use thiserror::Error;

/// Errors that abort a collector call.
///
/// Rows that cannot be expressed as tuples are not errors; collectors skip
/// them.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Legacy store query failed.
    #[error("legacy store error: {0}")]
    Store(#[from] StoreError),

    /// Authorization engine read failed.
    #[error("authorization engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectError>;
