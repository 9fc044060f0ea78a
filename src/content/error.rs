use thiserror::Error;

/// Failure from an account or content store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness constraint violated
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    /// The storage itself failed
    #[error("storage failure: {0}")]
    Backend(String),
}
