//! Periodic re-acquisition of every registered source.
//!
//! Each polling cycle acquires all sources concurrently and merges whatever
//! is new per source. The next cycle is scheduled only after every attempt
//! of the current one has settled, so cycles never overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{Item, Source};
use crate::pipeline::{merge_new, Pipeline};
use crate::store::{Mutation, SharedStore};

/// Default delay between polling cycles.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Source of delays between cycles, replaceable in tests.
#[async_trait]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sources: usize,
    pub new_items: usize,
    pub failures: usize,
}

pub struct Scheduler {
    store: SharedStore,
    pipeline: Pipeline,
    timer: Arc<dyn Timer + Send + Sync>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(store: SharedStore, pipeline: Pipeline, interval: Duration) -> Self {
        Self::with_timer(store, pipeline, interval, Arc::new(TokioTimer))
    }

    pub fn with_timer(
        store: SharedStore,
        pipeline: Pipeline,
        interval: Duration,
        timer: Arc<dyn Timer + Send + Sync>,
    ) -> Self {
        Self {
            store,
            pipeline,
            timer,
            interval,
        }
    }

    /// Run one polling cycle over the sources registered right now.
    ///
    /// Failures are logged and counted; they never abort the cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let sources = self.store.read(|state| state.sources.clone());

        let attempts = sources.iter().map(|source| async move {
            match self.pipeline.acquire(source).await {
                Ok(items) => Some(self.merge(source, items)),
                Err(e) => {
                    warn!("Failed to update {}: {}", source.address, e);
                    None
                }
            }
        });
        let results = join_all(attempts).await;

        let mut report = CycleReport {
            sources: sources.len(),
            ..CycleReport::default()
        };
        for result in results {
            match result {
                Some(count) => report.new_items += count,
                None => report.failures += 1,
            }
        }
        report
    }

    /// Merge `candidates` into the items owned by `source` only.
    fn merge(&self, source: &Source, candidates: Vec<Item>) -> usize {
        self.store.update(|store| {
            let fresh = merge_new(store.state().items_for_source(&source.id), &candidates);
            let count = fresh.len();
            store.apply(Mutation::PrependItems(fresh));
            if count > 0 {
                debug!("{} new items from {}", count, source.address);
            }
            count
        })
    }

    async fn run(self, running: Arc<AtomicBool>) {
        info!("Polling every {} ms", self.interval.as_millis());

        while running.load(Ordering::SeqCst) {
            self.timer.sleep(self.interval).await;

            if !running.load(Ordering::SeqCst) {
                break;
            }

            let start = Instant::now();
            let report = self.run_cycle().await;
            info!(
                "Poll complete: {} sources, {} new items, {} errors ({} ms)",
                report.sources,
                report.new_items,
                report.failures,
                start.elapsed().as_millis()
            );
        }
    }

    /// Spawn the polling loop. The first cycle runs after one interval.
    pub fn start(self) -> SchedulerHandle {
        let running = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(self.run(running.clone()));
        SchedulerHandle { running, task }
    }
}

pub struct SchedulerHandle {
    running: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.task.is_finished()
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::{mpsc, Semaphore};

    use super::*;
    use crate::domain::{ItemId, Source};
    use crate::extractor::tests::{RSS_SAMPLE, RSS_UPDATED_SAMPLE};
    use crate::fetcher::stub::StubFetcher;

    const GOOD: &str = "https://good.example/feed";
    const BAD: &str = "https://bad.example/feed";

    /// Reports each sleep and then waits for the test to release it.
    struct GatedTimer {
        ticks: mpsc::UnboundedSender<Duration>,
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl Timer for GatedTimer {
        async fn sleep(&self, duration: Duration) {
            let _ = self.ticks.send(duration);
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn register(store: &SharedStore, address: &str) -> Source {
        let source = Source::new(address.into(), address.into(), String::new());
        store.apply(Mutation::PrependSource(source.clone()));
        source
    }

    fn scheduler(store: &SharedStore, fetcher: Arc<StubFetcher>) -> Scheduler {
        Scheduler::new(
            store.clone(),
            Pipeline::new(fetcher),
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        )
    }

    #[tokio::test]
    async fn test_unchanged_content_is_not_duplicated() {
        let store = SharedStore::new();
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.serve(GOOD, RSS_SAMPLE);
        register(&store, GOOD);
        let scheduler = scheduler(&store, fetcher);

        let first = scheduler.run_cycle().await;
        let after_first = store.read(|s| s.items.len());
        let second = scheduler.run_cycle().await;
        let after_second = store.read(|s| s.items.len());

        assert_eq!(first.new_items, 2);
        assert_eq!(second.new_items, 0);
        assert_eq!(after_first, 2);
        assert_eq!(after_second, after_first);
    }

    #[tokio::test]
    async fn test_refetch_keeps_ids_and_seen_marks() {
        let store = SharedStore::new();
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.serve(GOOD, RSS_SAMPLE);
        register(&store, GOOD);
        let scheduler = scheduler(&store, fetcher);

        scheduler.run_cycle().await;
        let ids: Vec<ItemId> = store.read(|s| s.items.iter().map(|i| i.id).collect());
        store.apply(Mutation::MarkSeen(ids[0]));

        scheduler.run_cycle().await;

        let state = store.snapshot();
        let ids_after: Vec<ItemId> = state.items.iter().map(|i| i.id).collect();
        assert_eq!(ids_after, ids);
        assert!(state.is_seen(ids[0]));
        assert!(!state.is_seen(ids[1]));
    }

    #[tokio::test]
    async fn test_new_entries_are_prepended() {
        let store = SharedStore::new();
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.serve(GOOD, RSS_SAMPLE);
        register(&store, GOOD);
        let scheduler = scheduler(&store, fetcher.clone());

        scheduler.run_cycle().await;
        fetcher.serve(GOOD, RSS_UPDATED_SAMPLE);
        let report = scheduler.run_cycle().await;

        assert_eq!(report.new_items, 1);
        let links: Vec<String> = store.read(|s| s.items.iter().map(|i| i.permalink.clone()).collect());
        assert_eq!(
            links,
            vec![
                "https://example.com/item3",
                "https://example.com/item1",
                "https://example.com/item2",
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_source() {
        let store = SharedStore::new();
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.serve(GOOD, RSS_SAMPLE);
        fetcher.fail(BAD);
        let good = register(&store, GOOD);
        register(&store, BAD);

        let report = scheduler(&store, fetcher).run_cycle().await;

        assert_eq!(report, CycleReport { sources: 2, new_items: 2, failures: 1 });
        let owners: Vec<bool> = store.read(|s| s.items.iter().map(|i| i.source_id == good.id).collect());
        assert_eq!(owners, vec![true, true]);
    }

    #[tokio::test]
    async fn test_merge_only_reads_own_source() {
        let store = SharedStore::new();
        let fetcher = Arc::new(StubFetcher::new());
        // Both sources publish the same permalinks
        fetcher.serve(GOOD, RSS_SAMPLE);
        fetcher.serve(BAD, RSS_SAMPLE);
        register(&store, GOOD);
        register(&store, BAD);

        let report = scheduler(&store, fetcher).run_cycle().await;

        assert_eq!(report.new_items, 4);
        assert_eq!(store.read(|s| s.items.len()), 4);
    }

    #[tokio::test]
    async fn test_cycle_without_sources() {
        let store = SharedStore::new();
        let fetcher = Arc::new(StubFetcher::new());
        let report = scheduler(&store, fetcher.clone()).run_cycle().await;
        assert_eq!(report, CycleReport::default());
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_loop_waits_between_cycles() {
        let store = SharedStore::new();
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.serve(GOOD, RSS_SAMPLE);
        register(&store, GOOD);

        let (tx, mut ticks) = mpsc::unbounded_channel();
        let gate = Arc::new(Semaphore::new(0));
        let timer = Arc::new(GatedTimer {
            ticks: tx,
            gate: gate.clone(),
        });
        let handle = Scheduler::with_timer(
            store.clone(),
            Pipeline::new(fetcher.clone()),
            Duration::from_millis(250),
            timer,
        )
        .start();

        // Nothing is fetched before the first delay elapses
        assert_eq!(ticks.recv().await, Some(Duration::from_millis(250)));
        assert!(fetcher.calls().is_empty());

        gate.add_permits(1);
        assert!(ticks.recv().await.is_some());
        assert_eq!(fetcher.calls().len(), 1);
        assert_eq!(store.read(|s| s.items.len()), 2);

        gate.add_permits(1);
        assert!(ticks.recv().await.is_some());
        assert_eq!(fetcher.calls().len(), 2);
        assert_eq!(store.read(|s| s.items.len()), 2);

        assert!(handle.is_running());
        handle.stop();
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_sources_added_between_cycles_are_polled() {
        let store = SharedStore::new();
        let fetcher = Arc::new(StubFetcher::new());
        fetcher.serve(GOOD, RSS_SAMPLE);
        fetcher.serve(BAD, RSS_SAMPLE);
        register(&store, GOOD);
        let scheduler = scheduler(&store, fetcher.clone());

        scheduler.run_cycle().await;
        register(&store, BAD);
        let report = scheduler.run_cycle().await;

        assert_eq!(report.sources, 2);
        assert_eq!(fetcher.calls().len(), 3);
    }
}
