use gurl_core::CoreError;
use gurl_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short key: {0}")]
    InvalidKey(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("no free key found after {attempts} attempt(s)")]
    CollisionsExhausted { attempts: u32 },
    #[error("link not found: {0}")]
    NotFound(String),
    #[error("deletion token rejected for: {0}")]
    Unauthorized(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidKey(message) => Self::InvalidKey(message),
            CoreError::InvalidUrl(message) => Self::InvalidUrl(message),
            CoreError::InvalidSettings(message) => Self::InvalidSettings(message),
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Collision(_) => Self::CollisionsExhausted { attempts: 1 },
            StorageError::NotFound(key) => Self::NotFound(key),
            StorageError::Unauthorized(key) => Self::Unauthorized(key),
            StorageError::Invalid(core) => core.into(),
            other @ (StorageError::Storage(_) | StorageError::Serialization(_)) => {
                Self::Storage(other.to_string())
            }
        }
    }
}
