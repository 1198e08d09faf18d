use crate::error::{CoreError, Result};
use crate::key::MAX_KEY_LENGTH;
use jiff::SignedDuration;
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Longest accepted link lifetime, roughly a century.
pub const MAX_TTL: SignedDuration = SignedDuration::from_hours(24 * 365 * 100);

/// Immutable configuration shared by the store, the sweeper, and the
/// service layer. Built once at startup and validated before use.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct LinkSettings {
    /// Number of alphabet characters in a generated key.
    #[builder(default = 10)]
    pub key_length: usize,
    /// A separator is inserted before every `separator_every`-th character.
    #[builder(default = 5)]
    pub separator_every: usize,
    /// How long a link lives without being resolved.
    #[builder(default = SignedDuration::from_hours(24))]
    pub ttl: SignedDuration,
    /// Delay between two expiry sweeps.
    #[builder(default = Duration::from_secs(1))]
    pub sweep_interval: Duration,
    /// Upper bound on fresh keys tried by a single create call.
    #[builder(default = 3)]
    pub max_create_attempts: u32,
    /// Path segment short URLs are served under.
    #[builder(default = "/b/".to_string(), setter(into))]
    pub path_prefix: String,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LinkSettings {
    /// Length of a generated key once separators are inserted.
    pub fn generated_key_length(&self) -> usize {
        if self.key_length == 0 || self.separator_every == 0 {
            return self.key_length;
        }
        self.key_length + (self.key_length - 1) / self.separator_every
    }

    pub fn validate(&self) -> Result<()> {
        if self.key_length == 0 {
            return Err(invalid("key_length must be at least 1"));
        }
        if self.separator_every == 0 {
            return Err(invalid("separator_every must be at least 1"));
        }
        if self.generated_key_length() > MAX_KEY_LENGTH {
            return Err(invalid(format!(
                "generated keys would be {} characters, limit is {}",
                self.generated_key_length(),
                MAX_KEY_LENGTH
            )));
        }
        if !self.ttl.is_positive() {
            return Err(invalid(format!("ttl must be positive, got {}", self.ttl)));
        }
        if self.ttl > MAX_TTL {
            return Err(invalid(format!(
                "ttl {} exceeds the limit of {}",
                self.ttl, MAX_TTL
            )));
        }
        if self.sweep_interval.is_zero() {
            return Err(invalid("sweep_interval must be non-zero"));
        }
        if self.max_create_attempts == 0 {
            return Err(invalid("max_create_attempts must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::InvalidSettings(message.into())
}
