use crate::access::{AccessController, DeletionToken};
use crate::error::{Result, StorageError};
use gurl_core::{normalize_target, Clock, LinkRecord, LinkSettings, Origin, ShortKey};
use gurl_generator::Generator;
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, ReadableTableMetadata, Table, TableDefinition};
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// The single collection links live in, keyed by the short key.
const LINKS: TableDefinition<&str, &[u8]> = TableDefinition::new("gurls");

type LinkTable<'txn> = Table<'txn, &'static str, &'static [u8]>;

/// What a [`LinkStore::for_each_record`] visitor wants done with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Keep,
    Remove,
}

/// Counts gathered during one full scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub visited: usize,
    pub removed: usize,
    pub corrupt: usize,
}

/// Persistent key → link mapping on an embedded redb database.
///
/// Every operation runs as one transaction. redb admits a single write
/// transaction at a time and gives readers isolated snapshots, so create,
/// resolve, delete and the sweeper's scan are totally ordered.
///
/// The store is the only owner of the database handle; redb additionally
/// locks the file against a second open.
pub struct LinkStore<G, C> {
    db: Database,
    settings: LinkSettings,
    generator: G,
    clock: C,
}

impl<G: Generator, C: Clock> LinkStore<G, C> {
    /// Opens (or creates) the database file at `path`.
    ///
    /// Settings are validated and the link table is created before this
    /// returns, so any failure here should abort startup.
    pub fn open(
        path: impl AsRef<Path>,
        settings: LinkSettings,
        generator: G,
        clock: C,
    ) -> Result<Self> {
        settings.validate()?;
        let path = path.as_ref();
        let db = Database::create(path)?;
        info!(path = %path.display(), "opened link database");
        Self::init(db, settings, generator, clock)
    }

    /// Creates a store backed by memory only.
    pub fn in_memory(settings: LinkSettings, generator: G, clock: C) -> Result<Self> {
        settings.validate()?;
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::init(db, settings, generator, clock)
    }

    fn init(db: Database, settings: LinkSettings, generator: G, clock: C) -> Result<Self> {
        let txn = db.begin_write()?;
        txn.open_table(LINKS)?;
        txn.commit()?;

        Ok(Self {
            db,
            settings,
            generator,
            clock,
        })
    }

    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Stores a new link for `target` under a freshly generated key.
    ///
    /// The key is checked for existence in the same transaction that writes
    /// it. A hit fails with [`StorageError::Collision`] and leaves the store
    /// untouched; the caller decides whether to try again.
    pub fn create(&self, origin: &Origin, target: &str) -> Result<LinkRecord> {
        let target_url = normalize_target(target)?;
        let key = self.generator.generate();

        self.write(|table| {
            if table.get(key.as_str())?.is_some() {
                warn!(key = %key, "generated key collides with an existing link");
                return Err(StorageError::Collision(key.to_string()));
            }

            let expires_at = LinkRecord::expiry_from(self.clock.now(), self.settings.ttl)?;
            let record = LinkRecord {
                short_url: origin.short_url(&self.settings.path_prefix, &key),
                key: key.clone(),
                target_url,
                expires_at,
                deletion_token: DeletionToken::generate(),
            };
            let bytes = record.encode()?;
            table.insert(key.as_str(), bytes.as_slice())?;

            debug!(key = %key, target = %record.target_url, "created link");
            Ok(record)
        })
    }

    /// Looks up `key` and renews its expiry to `now + ttl`.
    ///
    /// Absent keys and records that fail to decode both yield
    /// [`StorageError::NotFound`].
    pub fn resolve(&self, key: &ShortKey) -> Result<LinkRecord> {
        self.write(|table| {
            let mut record = read_record(table, key)?;
            record.renew(self.clock.now(), self.settings.ttl)?;
            let bytes = record.encode()?;
            table.insert(key.as_str(), bytes.as_slice())?;

            trace!(key = %key, expires_at = %record.expires_at, "renewed link");
            Ok(record)
        })
    }

    /// Removes `key` if `token` matches its deletion token.
    pub fn delete(&self, key: &ShortKey, token: &str) -> Result<()> {
        self.write(|table| {
            let record = read_record(table, key)?;
            if !AccessController::authorize(&record, token) {
                warn!(key = %key, "rejected deletion with a wrong token");
                return Err(StorageError::Unauthorized(key.to_string()));
            }
            table.remove(key.as_str())?;

            debug!(key = %key, "deleted link");
            Ok(())
        })
    }

    /// Visits every stored entry inside one write transaction.
    ///
    /// The visitor sees each key together with its decoded record, or the
    /// decode error for corrupt entries. Entries it marks [`Visit::Remove`]
    /// are deleted in the same transaction once the scan finishes. Writers
    /// that arrive during the scan wait for it to commit and are never seen
    /// by it.
    pub fn for_each_record<F>(&self, mut visit: F) -> Result<ScanSummary>
    where
        F: FnMut(&str, Result<LinkRecord>) -> Visit,
    {
        self.write(|table| {
            let mut summary = ScanSummary::default();
            let mut doomed = Vec::new();

            for entry in table.iter()? {
                let (key, value) = entry?;
                summary.visited += 1;

                let decoded = LinkRecord::decode(value.value()).map_err(StorageError::from);
                if decoded.is_err() {
                    summary.corrupt += 1;
                }
                if visit(key.value(), decoded) == Visit::Remove {
                    doomed.push(key.value().to_owned());
                }
            }

            for key in &doomed {
                table.remove(key.as_str())?;
            }
            summary.removed = doomed.len();

            Ok(summary)
        })
    }

    /// Reads a record without renewing it.
    pub fn peek(&self, key: &ShortKey) -> Result<Option<LinkRecord>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(LINKS)?;
        let Some(bytes) = table.get(key.as_str())? else {
            return Ok(None);
        };
        Ok(Some(LinkRecord::decode(bytes.value())?))
    }

    /// Number of stored records, live or awaiting eviction.
    pub fn len(&self) -> Result<u64> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(LINKS)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Writes raw bytes under `key`, bypassing encoding. Lets tests plant
    /// corrupt entries.
    #[cfg(any(test, feature = "test-util"))]
    pub fn put_raw(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.write(|table| {
            table.insert(key, bytes)?;
            Ok(())
        })
    }

    /// Runs `f` against the link table in a write transaction, committing
    /// on `Ok` and aborting on `Err`.
    fn write<T>(&self, f: impl FnOnce(&mut LinkTable<'_>) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_write()?;
        let outcome = {
            let mut table = txn.open_table(LINKS)?;
            f(&mut table)
        };

        match outcome {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(err) => {
                txn.abort()?;
                Err(err)
            }
        }
    }
}

fn read_record(table: &LinkTable<'_>, key: &ShortKey) -> Result<LinkRecord> {
    let Some(bytes) = table.get(key.as_str())? else {
        trace!(key = %key, "link not found");
        return Err(StorageError::NotFound(key.to_string()));
    };

    LinkRecord::decode(bytes.value()).map_err(|err| {
        warn!(key = %key, error = %err, "stored link is unreadable");
        StorageError::NotFound(key.to_string())
    })
}
