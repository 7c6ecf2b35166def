use crate::lares::client::FetchError;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, instrument, warn};

/// Immutable cache snapshot; replaced wholesale, never mutated in place.
pub type Snapshot<R> = Arc<Vec<R>>;

/// One logical data set the coordinator can keep fresh.
#[async_trait]
pub trait PollSource: Send + Sync + 'static {
    type Row: Clone + Send + Sync + 'static;

    async fn poll(&self) -> Result<Vec<Self::Row>, FetchError>;
}

/// Shared periodic-refresh cache for a single [`PollSource`].
///
/// At most one fetch is in flight at any time: the refresh mutex serializes
/// timer ticks and forced refreshes, and the generation counter collapses
/// callers that queued up behind an in-flight fetch onto its result. Readers
/// go through the watch channel and never lock.
pub struct Coordinator<S: PollSource> {
    name: &'static str,
    source: S,
    scan_interval: Duration,
    refresh_timeout: Duration,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
    tx: watch::Sender<Snapshot<S::Row>>,
}

impl<S: PollSource> Coordinator<S> {
    pub fn new(name: &'static str, source: S, scan_interval: Duration, refresh_timeout: Duration) -> Self {
        let (tx, _) = watch::channel::<Snapshot<S::Row>>(Arc::new(Vec::new()));

        Coordinator {
            name,
            source,
            scan_interval,
            refresh_timeout,
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            tx,
        }
    }

    pub fn snapshot(&self) -> Snapshot<S::Row> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S::Row>> {
        self.tx.subscribe()
    }

    /// Refreshes the cache and returns the resulting snapshot.
    ///
    /// A fetch error keeps the previous snapshot, a timeout yields an empty
    /// one; neither propagates. Subscribers are notified either way.
    #[instrument(skip(self), fields(name = self.name))]
    pub async fn refresh(&self) -> Snapshot<S::Row> {
        let seen = self.generation.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;
        if self.generation.load(Ordering::Acquire) != seen {
            // A refresh completed while this caller waited for the lock.
            return self.snapshot();
        }

        let snapshot = match timeout(self.refresh_timeout, self.source.poll()).await {
            Ok(Ok(rows)) => {
                debug!("🟢 Refreshed '{}', {} row(s)", self.name, rows.len());
                Arc::new(rows)
            }
            Ok(Err(e)) => {
                debug!("🔴 Refreshing '{}' failed, keeping the previous snapshot: {}", self.name, e);
                self.snapshot()
            }
            Err(_) => {
                warn!("⏳ Refreshing '{}' timed out after {:?}", self.name, self.refresh_timeout);
                Arc::new(Vec::new())
            }
        };

        self.generation.fetch_add(1, Ordering::Release);
        self.tx.send_replace(snapshot.clone());
        snapshot
    }

    /// The timer loop. The first scheduled tick fires a full scan interval
    /// after start; setup is expected to have primed the cache already.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // The immediate first tick.

        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }
}
