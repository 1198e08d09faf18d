use thiserror::Error;

/// Result type for core validation.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short key: {0}")]
    InvalidKey(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid link settings: {0}")]
    InvalidSettings(String),
}
