use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("post not found ({0})")]
    NotFound(String),

    #[error("duplicated {0}")]
    AlreadyExists(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("corrupted record: {0}")]
    Corrupted(String),
}
