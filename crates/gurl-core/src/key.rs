use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Separator glyph inserted into generated keys.
pub const SEPARATOR: char = '-';

/// Longest key accepted by [`ShortKey::new`], separators included.
pub const MAX_KEY_LENGTH: usize = 64;

/// A validated short identifier for a stored link.
///
/// Keys are 1-64 characters long, drawn from `[A-Za-z0-9]` plus the
/// [`SEPARATOR`], and never begin or end with the separator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortKey(String);

impl ShortKey {
    /// Creates a new `ShortKey` after validating the input.
    pub fn new(key: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Creates a `ShortKey` without validation.
    ///
    /// Use this only for keys produced by trusted internal sources
    /// (e.g. generators that are guaranteed to produce valid output).
    pub fn new_unchecked(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn validate(key: &str) -> std::result::Result<(), CoreError> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CoreError::InvalidKey(format!(
                "length must be between 1 and {}, got {}",
                MAX_KEY_LENGTH,
                key.len()
            )));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == SEPARATOR)
        {
            return Err(CoreError::InvalidKey(format!(
                "must contain only alphanumeric characters or '{}': '{}'",
                SEPARATOR, key
            )));
        }

        if key.starts_with(SEPARATOR) || key.ends_with(SEPARATOR) {
            return Err(CoreError::InvalidKey(format!(
                "must not begin or end with '{}': '{}'",
                SEPARATOR, key
            )));
        }

        Ok(())
    }
}

impl Display for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
