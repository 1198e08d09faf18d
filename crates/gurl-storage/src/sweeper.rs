use crate::error::Result;
use crate::store::{LinkStore, ScanSummary, Visit};
use gurl_core::Clock;
use gurl_generator::Generator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Shortest interval a sweeper ticks at; `tokio::time::interval` rejects zero.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Background task that evicts expired links.
///
/// Each tick opens one write transaction on the store, scans every record,
/// and removes those whose expiry is at or before the time observed when the
/// scan started. Per-record decode failures are logged and skipped; a failed
/// transaction is logged and retried on the next tick.
pub struct ExpirySweeper<G, C> {
    store: Arc<LinkStore<G, C>>,
    interval: Duration,
}

impl<G, C> Clone for ExpirySweeper<G, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            interval: self.interval,
        }
    }
}

impl<G: Generator, C: Clock> ExpirySweeper<G, C> {
    /// Creates a sweeper ticking at the store's configured interval.
    pub fn new(store: Arc<LinkStore<G, C>>) -> Self {
        let interval = store.settings().sweep_interval;
        Self::with_interval(store, interval)
    }

    /// Creates a sweeper with its own interval, raised to at least
    /// [`MIN_SWEEP_INTERVAL`].
    pub fn with_interval(store: Arc<LinkStore<G, C>>, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(MIN_SWEEP_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs a single sweep synchronously.
    pub fn sweep_once(&self) -> Result<ScanSummary> {
        let now = self.store.clock().now();

        let summary = self.store.for_each_record(|key, record| match record {
            Ok(record) if record.is_expired(now) => {
                let overdue = now.duration_since(record.expires_at);
                debug!(key = %key, overdue = %overdue, "link expired");
                Visit::Remove
            }
            Ok(_) => Visit::Keep,
            Err(err) => {
                warn!(key = %key, error = %err, "skipping unreadable link during sweep");
                Visit::Keep
            }
        })?;

        if summary.removed > 0 {
            info!(
                removed = summary.removed,
                remaining = summary.visited - summary.removed,
                "evicted expired links"
            );
        }

        Ok(summary)
    }

    /// Starts the sweeper on the current Tokio runtime.
    ///
    /// The first sweep happens one interval after spawning. Scans run on the
    /// blocking pool because redb transactions are synchronous.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        SweeperHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        info!(interval = ?self.interval, "expiry sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let sweeper = self.clone();
                    match tokio::task::spawn_blocking(move || sweeper.sweep_once()).await {
                        Ok(Ok(_)) => {}
                        Ok(Err(err)) => error!(error = %err, "sweep failed; retrying next tick"),
                        Err(err) => error!(error = %err, "sweep task panicked; retrying next tick"),
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("expiry sweeper stopped");
    }
}

/// Handle to a running [`ExpirySweeper`].
///
/// Dropping the handle also stops the sweeper, after any scan in progress.
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops scheduling further sweeps and waits for the task to exit.
    ///
    /// A scan already in progress runs to completion first.
    pub async fn stop(self) {
        // the receiver only goes away once the task has exited
        let _ = self.shutdown_tx.send(true);
        if let Err(err) = self.task.await {
            error!(error = %err, "expiry sweeper task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
