use gurl_core::CoreError;
use thiserror::Error;

/// Result type for link store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("generated key already in use: {0}")]
    Collision(String),
    #[error("link not found: {0}")]
    NotFound(String),
    #[error("deletion token rejected for: {0}")]
    Unauthorized(String),
    #[error("storage operation failed: {0}")]
    Storage(String),
    #[error("record serialization failed: {0}")]
    Serialization(String),
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Storage(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Storage(format!("cannot open database: {err}"))
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Storage(format!("cannot begin transaction: {err}"))
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Storage(format!("cannot open table: {err}"))
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Storage(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Storage(format!("cannot commit transaction: {err}"))
    }
}
