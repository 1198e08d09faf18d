use crate::error::{Result, ShortenerError};
use crate::shortener::Shortener;
use async_trait::async_trait;
use gurl_core::{Clock, LinkRecord, Origin, ShortKey};
use gurl_generator::Generator;
use gurl_storage::{LinkStore, StorageError};
use std::sync::Arc;
use tracing::{debug, warn};

/// The async face of a [`LinkStore`].
///
/// Every store call runs on tokio's blocking pool since redb transactions
/// block the calling thread. `create` retries with a fresh key when the
/// generated one is already taken, up to `max_create_attempts` times.
pub struct ShortenerService<G, C> {
    store: Arc<LinkStore<G, C>>,
}

impl<G, C> Clone for ShortenerService<G, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<G: Generator, C: Clock> ShortenerService<G, C> {
    pub fn new(store: Arc<LinkStore<G, C>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<LinkStore<G, C>> {
        &self.store
    }

    async fn blocking<T, F>(&self, f: F) -> std::result::Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&LinkStore<G, C>) -> std::result::Result<T, StorageError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StorageError::Storage(format!("store task failed: {e}")))?
    }
}

#[async_trait]
impl<G: Generator, C: Clock> Shortener for ShortenerService<G, C> {
    async fn create(&self, origin: Origin, target: String) -> Result<LinkRecord> {
        let origin = Arc::new(origin);
        let target = Arc::new(target);
        let attempts = self.store.settings().max_create_attempts.max(1);

        for attempt in 1..=attempts {
            let (origin, target) = (Arc::clone(&origin), Arc::clone(&target));
            match self
                .blocking(move |store| store.create(&origin, &target))
                .await
            {
                Ok(record) => {
                    debug!(key = %record.key, attempt, "link created");
                    return Ok(record);
                }
                Err(StorageError::Collision(key)) => {
                    warn!(%key, attempt, attempts, "key collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ShortenerError::CollisionsExhausted { attempts })
    }

    async fn resolve(&self, key: &ShortKey) -> Result<LinkRecord> {
        let key = key.clone();
        Ok(self.blocking(move |store| store.resolve(&key)).await?)
    }

    async fn delete(&self, key: &ShortKey, token: &str) -> Result<()> {
        let key = key.clone();
        let token = token.to_string();
        Ok(self.blocking(move |store| store.delete(&key, &token)).await?)
    }
}
