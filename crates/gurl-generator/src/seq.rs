use crate::Generator;
use gurl_core::ShortKey;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic key generator using a sequential counter.
///
/// This generator produces keys like "seq000000", "seq000001", etc. It is
/// meant for tests and reproducible runs, not for production traffic.
///
/// With [`SeqGenerator::wrapping`] the counter cycles back to its start
/// after `period` keys, which makes collisions easy to provoke.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    start: u64,
    period: Option<u64>,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            start: self.start,
            period: self.period,
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a new sequential generator with a custom prefix.
    ///
    /// The prefix must be alphanumeric for generated keys to be valid.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Creates a new sequential generator starting from a specific counter value.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            start: offset,
            period: None,
            prefix: prefix.into(),
        }
    }

    /// Creates a generator that repeats the same `period` keys forever.
    pub fn wrapping(prefix: impl Into<String>, period: u64) -> Self {
        Self {
            counter: AtomicU64::new(0),
            start: 0,
            period: Some(period.max(1)),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> ShortKey {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        let count = match self.period {
            Some(period) => self.start + (count - self.start) % period,
            None => count,
        };
        ShortKey::new_unchecked(format!("{}{:06}", self.prefix, count))
    }
}
