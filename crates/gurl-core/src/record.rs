use crate::error::{CoreError, Result};
use crate::key::ShortKey;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// A stored link: the unit of persisted state.
///
/// Records are encoded as JSON. Unknown fields are ignored on decode, so
/// newer writers can add fields without breaking older readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The short identifier, unique across the store.
    pub key: ShortKey,
    /// Absolute URL the key redirects to.
    pub target_url: String,
    /// Fully-qualified short link, computed at creation time.
    pub short_url: String,
    /// After this instant the record may be evicted.
    pub expires_at: Timestamp,
    /// Secret required to delete the record. Never rotated.
    pub deletion_token: String,
}

impl LinkRecord {
    /// Returns true once `now` has reached `expires_at`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// The instant a link touched at `now` expires.
    pub fn expiry_from(now: Timestamp, ttl: SignedDuration) -> Result<Timestamp> {
        now.checked_add(ttl).map_err(|err| {
            CoreError::InvalidSettings(format!("ttl {ttl} overflows expiry from {now}: {err}"))
        })
    }

    /// Pushes the expiry out to `now + ttl`. Leaves the record untouched if
    /// that instant is not representable.
    pub fn renew(&mut self, now: Timestamp, ttl: SignedDuration) -> Result<()> {
        self.expires_at = Self::expiry_from(now, ttl)?;
        Ok(())
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
