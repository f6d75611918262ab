//! Error types for the tuple model.

use thiserror::Error;

/// Errors that can occur while decoding tuple string forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TupleError {
    #[error("malformed entry {0:?}: expected type:id[#relation]")]
    MalformedEntry(String),

    #[error("malformed tuple {0:?}: expected object#relation@subject[,condition]")]
    MalformedTuple(String),

    #[error("malformed condition {0:?}: expected name[value,...]")]
    MalformedCondition(String),
}

/// Result type for tuple decoding.
pub type Result<T> = std::result::Result<T, TupleError>;
