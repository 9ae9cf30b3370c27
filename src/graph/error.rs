//! Typed error surface for graph operations.
//!
//! Caller errors (`NotFound`, `InvalidArgument`) surface immediately and are
//! never retried. `ConflictRetryExhausted` and `ResourceExhausted` are
//! transient conditions the caller may retry or relax.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A referenced experience, context, or connection id does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A parameter failed validation (strength range, unknown enum value).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A concurrent update could not commit within the retry budget.
    #[error("concurrent update could not commit after {attempts} attempts")]
    ConflictRetryExhausted { attempts: u32 },

    /// A bounded search exceeded its configured cap. Partial results are
    /// withheld rather than returned as if complete.
    #[error("resource cap exceeded: {0}")]
    ResourceExhausted(String),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),

    /// The external similarity provider failed while scoring a candidate.
    #[error("similarity provider failed: {0}")]
    Similarity(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
