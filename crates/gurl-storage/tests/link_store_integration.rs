use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use gurl_core::{Clock, LinkSettings, ManualClock, Origin, ShortKey, SystemClock};
use gurl_generator::{RandomKeyGenerator, SeqGenerator};
use gurl_storage::{ExpirySweeper, LinkStore, StorageError, Visit};
use jiff::{SignedDuration, Timestamp};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("uri.store")
    }

    fn open<C: Clock>(&self, clock: C) -> LinkStore<RandomKeyGenerator, C> {
        let settings = LinkSettings::default();
        let generator = RandomKeyGenerator::from_settings(&settings);
        LinkStore::open(self.path(), settings, generator, clock).expect("open store")
    }
}

fn origin() -> Origin {
    Origin::new(false, "localhost:9999")
}

fn start() -> Timestamp {
    Timestamp::from_second(1_700_000_000).unwrap()
}

#[test]
fn create_then_resolve_round_trips() {
    let fixture = Fixture::new();
    let store = fixture.open(SystemClock);

    let created = store.create(&origin(), "example.com/page").unwrap();
    let resolved = store.resolve(&created.key).unwrap();

    assert_eq!(resolved.target_url, "https://example.com/page");
    assert_eq!(resolved.key, created.key);
}

#[test]
fn links_survive_reopen() {
    let fixture = Fixture::new();
    let created = {
        let store = fixture.open(SystemClock);
        store.create(&origin(), "https://persist.example").unwrap()
    };

    let store = fixture.open(SystemClock);
    let resolved = store.resolve(&created.key).unwrap();

    assert_eq!(resolved.target_url, "https://persist.example");
    assert_eq!(resolved.deletion_token, created.deletion_token);
}

#[test]
fn database_file_is_exclusively_owned() {
    let fixture = Fixture::new();
    let _store = fixture.open(SystemClock);

    let second = LinkStore::open(
        fixture.path(),
        LinkSettings::default(),
        RandomKeyGenerator::new(10, 5),
        SystemClock,
    );

    assert!(matches!(second, Err(StorageError::Storage(_))));
}

#[test]
fn invalid_settings_fail_before_touching_disk() {
    let fixture = Fixture::new();
    let settings = LinkSettings::builder().ttl(SignedDuration::ZERO).build();

    let result = LinkStore::open(
        fixture.path(),
        settings,
        RandomKeyGenerator::new(10, 5),
        SystemClock,
    );

    assert!(matches!(result, Err(StorageError::Invalid(_))));
    assert!(!fixture.path().exists());
}

#[test]
fn end_to_end_create_shape() {
    let fixture = Fixture::new();
    let store = fixture.open(SystemClock);
    let before = Timestamp::now();

    let record = store.create(&origin(), "example.com/page").unwrap();

    let key = record.key.as_str();
    assert_eq!(key.len(), 11);
    assert_eq!(key.matches('-').count(), 1);
    assert_eq!(key.find('-'), Some(5));
    assert!(record.short_url.ends_with(&format!("/{key}")));
    assert_eq!(record.target_url, "https://example.com/page");
    assert!(record.expires_at >= before + SignedDuration::from_hours(24));
}

#[test]
fn delete_flow() {
    let fixture = Fixture::new();
    let store = fixture.open(SystemClock);
    let record = store.create(&origin(), "example.com").unwrap();

    let err = store.delete(&record.key, "wrong").unwrap_err();
    assert!(matches!(err, StorageError::Unauthorized(_)));
    assert!(store.resolve(&record.key).is_ok());

    store.delete(&record.key, &record.deletion_token).unwrap();
    assert!(matches!(
        store.resolve(&record.key),
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        store.delete(&record.key, &record.deletion_token),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn concurrent_creates_never_share_a_key() {
    let fixture = Fixture::new();
    let store = Arc::new(fixture.open(SystemClock));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        store
                            .create(&origin(), &format!("example.com/{worker}/{i}"))
                            .unwrap()
                            .key
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let keys: HashSet<ShortKey> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(keys.len(), 400);
    assert_eq!(store.len().unwrap(), 400);
}

#[test]
fn concurrent_colliding_creates_keep_the_first_writer() {
    let store = Arc::new(
        LinkStore::in_memory(
            LinkSettings::default(),
            SeqGenerator::wrapping("same", 1),
            SystemClock,
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.create(&origin(), &format!("example.com/{i}")))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let collisions = results
        .iter()
        .filter(|r| matches!(r, Err(StorageError::Collision(_))))
        .count();

    assert_eq!(winners.len(), 1);
    assert_eq!(collisions, 7);
    let stored = store.peek(&winners[0].key).unwrap().unwrap();
    assert_eq!(&stored, winners[0]);
}

#[test]
fn writers_wait_for_an_in_flight_scan() {
    let store = Arc::new(
        LinkStore::in_memory(
            LinkSettings::default(),
            SeqGenerator::with_prefix("w"),
            SystemClock,
        )
        .unwrap(),
    );
    store.create(&origin(), "first.example").unwrap();

    let mut writer = None;
    let summary = store
        .for_each_record(|_, _| {
            if writer.is_none() {
                let store = Arc::clone(&store);
                writer = Some(thread::spawn(move || {
                    store.create(&origin(), "second.example").unwrap()
                }));
                // give the writer a chance to block on the write lock
                thread::sleep(Duration::from_millis(50));
            }
            Visit::Remove
        })
        .unwrap();

    let second = writer.unwrap().join().unwrap();

    assert_eq!(summary.visited, 1);
    assert_eq!(summary.removed, 1);
    assert_eq!(store.len().unwrap(), 1);
    assert!(store.resolve(&second.key).is_ok());
}

#[test]
fn sweep_after_ttl_makes_link_unresolvable() {
    let fixture = Fixture::new();
    let clock = ManualClock::new(start());
    let store = Arc::new(fixture.open(clock.clone()));
    let sweeper = ExpirySweeper::new(Arc::clone(&store));
    let record = store.create(&origin(), "example.com").unwrap();

    // before the next sweep an expired link may still resolve
    clock.advance(SignedDuration::from_hours(25));
    sweeper.sweep_once().unwrap();

    assert!(matches!(
        store.resolve(&record.key),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn corrupt_entries_survive_reopen_and_sweeps() {
    let fixture = Fixture::new();
    {
        let store = fixture.open(SystemClock);
        store.put_raw("mangled", b"{\"key\":").unwrap();
    }

    let clock = ManualClock::new(start());
    let store = Arc::new(fixture.open(clock.clone()));
    clock.advance(SignedDuration::from_hours(48));
    let summary = ExpirySweeper::new(Arc::clone(&store)).sweep_once().unwrap();

    assert_eq!(summary.corrupt, 1);
    assert_eq!(summary.removed, 0);
    assert!(matches!(
        store.resolve(&ShortKey::new_unchecked("mangled")),
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn background_sweeper_evicts_expired_links() {
    let clock = ManualClock::new(start());
    let settings = LinkSettings::builder()
        .ttl(SignedDuration::from_secs(5))
        .sweep_interval(Duration::from_millis(20))
        .build();
    let store = Arc::new(
        LinkStore::in_memory(settings, SeqGenerator::with_prefix("bg"), clock.clone()).unwrap(),
    );
    let handle = ExpirySweeper::new(Arc::clone(&store)).spawn();

    let expiring = store.create(&origin(), "expiring.example").unwrap();
    clock.advance(SignedDuration::from_secs(3));
    let fresh = store.create(&origin(), "fresh.example").unwrap();
    clock.advance(SignedDuration::from_secs(3));

    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(20))
        .until_async(|| async { store.peek(&expiring.key).unwrap().is_none() })
        .await;

    assert!(store.peek(&fresh.key).unwrap().is_some());
    handle.stop().await;

    // no more sweeps once stopped
    clock.advance(SignedDuration::from_secs(60));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.peek(&fresh.key).unwrap().is_some());
}
