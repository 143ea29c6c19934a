use crate::entry::EntryId;
use thiserror::Error;

/// Errors returned by the redirect ring.
pub type Result<T> = std::result::Result<T, RingError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("shortcode already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RingError {
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("shortcode already exists: {0}")]
    DuplicateShortcode(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("entry {0} is already first")]
    AlreadyFirst(EntryId),
    #[error("entry {0} is already last")]
    AlreadyLast(EntryId),
    #[error("the ring has no entries")]
    EmptyRing,
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("inconsistent ring state: {0}")]
    InconsistentState(String),
}

impl From<StorageError> for RingError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::DuplicateShortcode(code),
            other => Self::Storage(other.to_string()),
        }
    }
}
