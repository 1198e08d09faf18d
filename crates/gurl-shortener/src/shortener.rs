use crate::error::Result;
use async_trait::async_trait;
use gurl_core::{LinkRecord, Origin, ShortKey};

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores `target` under a fresh key and returns the new record.
    async fn create(&self, origin: Origin, target: String) -> Result<LinkRecord>;

    /// Resolves a key to its record, renewing the link's TTL.
    async fn resolve(&self, key: &ShortKey) -> Result<LinkRecord>;

    /// Deletes a link if `token` matches its deletion token.
    async fn delete(&self, key: &ShortKey, token: &str) -> Result<()>;
}
