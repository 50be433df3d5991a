//! # CrawlerPool: orchestrates the crawl job pool.
//!
//! The [`CrawlerPool`] composes the identity allocator, the active job
//! registry, the suspended-id set, the finished-job archive, the signal
//! mapper and the resource monitor behind one public surface:
//! start/stop/pause/resume per job, a unified snapshot view, and a
//! process-wide shutdown.
//!
//! ## High-level architecture
//! ```text
//! start(spec):
//!   IdAllocator ─► Job ─► EngineFactory::build ─► Registry::register
//!        │
//!        └─► SignalMapper::attach (lifecycle + optional stats stream)
//!        └─► Engine::start(child token)        (non-blocking submission)
//!
//! Event flow:
//!   Engine ── JobSignal ──► mapper ── Event ──► SignalHub
//!                                                 ├─► LifecycleListener (internal)
//!                                                 │     crawling flag / spider ref /
//!                                                 │     archive / suspended cleanup /
//!                                                 │     registry removal
//!                                                 ├─► user subscribers
//!                                                 └─► Bus (ordered stream)
//! ```
//!
//! ## Concurrency rules
//! - Pool state (registry, suspended set, archive) is mutated from event
//!   callbacks and public operations; all mutations go through async locks.
//! - No public operation blocks on a job's internal execution: `stop`,
//!   `pause` and `resume` are requests; `snapshot` only reads
//!   already-published fields.
//! - `pause` inserts into the suspended set **before** signaling the
//!   engine, and `resume` removes **before** signaling, so a status query
//!   between the two steps never reports stale state.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{broadcast, Notify, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::PoolConfig;
use crate::core::ids::IdAllocator;
use crate::core::mapper::SignalMapper;
use crate::core::registry::{JobHandle, Registry};
use crate::engine::EngineFactory;
use crate::error::{ListenerError, PoolError};
use crate::events::{Event, EventKind, SignalHub};
use crate::jobs::{self, CrawlSpec, FinishedJob, FinishedJobs, JobId, JobView};
use crate::monitor::{NoopMonitor, ResourceMonitor};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Coordinates job identity, lifecycle, event aggregation and archival for
/// a pool of concurrently running crawl jobs.
pub struct CrawlerPool {
    cfg: PoolConfig,
    hub: Arc<SignalHub>,
    ids: IdAllocator,
    mapper: SignalMapper,
    registry: Arc<Registry>,
    suspended: Arc<RwLock<HashSet<JobId>>>,
    finished: Arc<FinishedJobs>,
    drained: Arc<Notify>,
    engines: Arc<dyn EngineFactory>,
    monitor: Arc<dyn ResourceMonitor>,
    runtime_token: CancellationToken,
}

impl CrawlerPool {
    /// Starts building a pool around the given engine factory.
    pub fn builder(engines: Arc<dyn EngineFactory>) -> CrawlerPoolBuilder {
        CrawlerPoolBuilder {
            cfg: PoolConfig::default(),
            engines,
            subscribers: Vec::new(),
            monitor: Arc::new(NoopMonitor),
        }
    }

    /// Starts a new crawl job and returns its id immediately.
    ///
    /// Allocates the id, constructs and registers the job, attaches the
    /// mapper to all of the engine's event sources, and begins execution.
    /// Does not wait for the job to reach a running state.
    pub async fn start(&self, spec: CrawlSpec) -> JobId {
        let id = self.ids.allocate();
        let job = jobs::Job::new(id, &spec);
        let engine = self.engines.build(&spec, &job);
        let token = self.runtime_token.child_token();

        // Subscribe before the engine runs so no signal is missed.
        self.mapper.attach(&job, &engine, &token);
        self.registry
            .register(Arc::new(JobHandle {
                job,
                engine: Arc::clone(&engine),
                cancel: token.clone(),
            }))
            .await;

        engine.start(token);
        debug!(job = %id, seed = %spec.seed(), "job started");
        id
    }

    /// Schedules shutdown of one job. Non-blocking; teardown completion is
    /// observed via the event stream or `snapshot()`.
    pub async fn stop(&self, id: JobId) -> Result<(), PoolError> {
        let handle = self.registry.lookup(id).await?;
        // Flip the flag first so a status query never sees a stale
        // "crawling" between the request and the engine's acknowledgement.
        handle.job.set_crawling(false);
        handle.engine.stop();
        Ok(())
    }

    /// Pauses one job.
    pub async fn pause(&self, id: JobId) -> Result<(), PoolError> {
        let handle = self.registry.lookup(id).await?;
        self.suspended.write().await.insert(id);
        // The job may close between the lookup and the insert. The close
        // listener removes the registry entry before it clears the
        // suspended set, so an insert that lands after that cleanup is
        // caught here and undone.
        if self.registry.lookup(id).await.is_err() {
            self.suspended.write().await.remove(&id);
            return Err(PoolError::NotFound { id });
        }
        handle.engine.pause();
        Ok(())
    }

    /// Resumes one paused job.
    ///
    /// Fails with [`PoolError::NotPaused`] if the id is not in the
    /// suspended set — a resume on a never-paused or already-resumed job is
    /// a correctness bug, never a no-op.
    pub async fn resume(&self, id: JobId) -> Result<(), PoolError> {
        let handle = self.registry.lookup(id).await?;
        if !self.suspended.write().await.remove(&id) {
            return Err(PoolError::NotPaused { id });
        }
        handle.engine.resume();
        Ok(())
    }

    /// Returns the job with the given id, or [`PoolError::NotFound`].
    pub async fn lookup(&self, id: JobId) -> Result<Arc<jobs::Job>, PoolError> {
        Ok(Arc::clone(&self.registry.lookup(id).await?.job))
    }

    /// Returns views of the active jobs, ascending id, with derived
    /// statuses. Jobs that already produced a finished record are
    /// suppressed.
    pub async fn active_jobs(&self) -> Vec<JobView> {
        // Registry first, archive second. A job closing in between then
        // shows up in the archive read and is filtered out; the reverse
        // order would let it slip past a stale filter set.
        let handles = self.registry.list().await;
        let finished_ids = self.finished.ids().await;
        let suspended = self.suspended.read().await.clone();
        Self::active_views(&handles, &finished_ids, &suspended)
    }

    /// Returns the finished records, most recent first.
    pub async fn finished_jobs(&self) -> Vec<FinishedJob> {
        self.finished.list().await
    }

    /// Current crawl state: active entries followed by archived entries.
    ///
    /// An id never appears in both partitions: both partitions come from
    /// one archive read, taken after the registry listing, so a job caught
    /// mid-close lands in exactly one of them.
    pub async fn snapshot(&self) -> Vec<JobView> {
        let handles = self.registry.list().await;
        let finished = self.finished.list().await;
        let suspended = self.suspended.read().await.clone();

        let finished_ids: HashSet<JobId> = finished.iter().map(|r| r.id).collect();
        let mut views = Self::active_views(&handles, &finished_ids, &suspended);
        views.extend(finished.iter().map(JobView::from));
        views
    }

    fn active_views(
        handles: &[Arc<JobHandle>],
        finished_ids: &HashSet<JobId>,
        suspended: &HashSet<JobId>,
    ) -> Vec<JobView> {
        let mut views = Vec::new();
        for handle in handles {
            let job = &handle.job;
            if finished_ids.contains(&job.id()) {
                continue;
            }
            let status = jobs::derive(
                job.spider_present(),
                job.is_crawling(),
                suspended.contains(&job.id()),
            );
            views.push(JobView::active(job, status));
        }
        views
    }

    /// Creates a new receiver for the ordered canonical event stream.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.hub.subscribe()
    }

    /// Terminates the pool: stops the resource monitor, schedules shutdown
    /// of every active engine, waits up to the configured grace for jobs to
    /// close, then cancels the runtime token.
    pub async fn shutdown(&self) {
        self.monitor.stop();

        for handle in self.registry.list().await {
            handle.job.set_crawling(false);
            handle.engine.stop();
        }

        if let Some(grace) = self.cfg.shutdown_grace() {
            // Woken by the close listener on every registry removal; a
            // removal between the emptiness check and the wait leaves a
            // stored permit, so no wake is lost.
            let drained = async {
                while !self.registry.is_empty().await {
                    self.drained.notified().await;
                }
            };
            if tokio::time::timeout(grace, drained).await.is_err() {
                debug!("shutdown grace exceeded; cancelling remaining jobs");
            }
        }

        self.runtime_token.cancel();
    }
}

/// Builder for [`CrawlerPool`].
pub struct CrawlerPoolBuilder {
    cfg: PoolConfig,
    engines: Arc<dyn EngineFactory>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    monitor: Arc<dyn ResourceMonitor>,
}

impl CrawlerPoolBuilder {
    /// Replaces the default configuration.
    pub fn config(mut self, cfg: PoolConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Registers one subscriber.
    pub fn with_subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Registers a batch of subscribers.
    pub fn with_subscribers(mut self, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers.extend(subs);
        self
    }

    /// Replaces the no-op resource monitor.
    pub fn with_monitor(mut self, monitor: Arc<dyn ResourceMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Builds the pool and starts the resource monitor.
    pub fn build(self) -> CrawlerPool {
        let registry = Arc::new(Registry::new());
        let suspended = Arc::new(RwLock::new(HashSet::new()));
        let finished = Arc::new(FinishedJobs::new());
        let drained = Arc::new(Notify::new());

        // The pool's own close listener runs first, so by the time user
        // subscribers ack an awaited spider-closed, the archive exists.
        let mut subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LifecycleListener {
            registry: Arc::clone(&registry),
            suspended: Arc::clone(&suspended),
            finished: Arc::clone(&finished),
            drained: Arc::clone(&drained),
        })];
        subs.extend(self.subscribers);

        let hub = Arc::new(SignalHub::new(
            self.cfg.bus_capacity_clamped(),
            SubscriberSet::new(subs, self.cfg.subscriber_queue),
        ));

        self.monitor.start();

        CrawlerPool {
            mapper: SignalMapper::new(Arc::clone(&hub)),
            cfg: self.cfg,
            hub,
            ids: IdAllocator::new(),
            registry,
            suspended,
            finished,
            drained,
            engines: self.engines,
            monitor: self.monitor,
            runtime_token: CancellationToken::new(),
        }
    }
}

/// Internal subscriber keeping job state, the archive, the suspended set
/// and the registry consistent with the canonical event stream.
struct LifecycleListener {
    registry: Arc<Registry>,
    suspended: Arc<RwLock<HashSet<JobId>>>,
    finished: Arc<FinishedJobs>,
    drained: Arc<Notify>,
}

impl LifecycleListener {
    /// Terminal closure: archive once, then tear down bookkeeping.
    async fn on_closed(&self, ev: &Event) -> Result<(), ListenerError> {
        let job = &ev.job;
        let reason = ev.reason.clone().unwrap_or_else(|| Arc::from("finished"));

        match self.finished.record(job, reason).await {
            Ok(()) => {}
            Err(PoolError::DuplicateRecord { id }) => {
                // Some engines re-deliver close signals under error
                // conditions; the first record wins.
                debug!(job = %id, "duplicate close ignored");
                return Ok(());
            }
            Err(err) => {
                return Err(ListenerError::new("lifecycle-listener", err.to_string()));
            }
        }

        job.set_crawling(false);
        job.detach_spider();

        if let Some(handle) = self.registry.remove(job.id()).await {
            handle.cancel.cancel();
        }
        self.drained.notify_one();

        // Suspended cleanup runs after the registry removal: `pause`
        // re-checks registry membership after its own insert, so any
        // insert still standing here predates the removal and is cleared
        // now. A closed job never leaves a stale suspended marker.
        self.suspended.write().await.remove(&job.id());
        Ok(())
    }
}

#[async_trait::async_trait]
impl Subscribe for LifecycleListener {
    async fn on_event(&self, ev: &Event) -> Result<(), ListenerError> {
        match ev.kind {
            EventKind::EngineStarted => {
                ev.job.set_crawling(true);
                Ok(())
            }
            EventKind::SpiderOpened => {
                ev.job.attach_spider(ev.job.seed().clone());
                Ok(())
            }
            EventKind::SpiderClosing => {
                ev.job.set_crawling(false);
                Ok(())
            }
            EventKind::SpiderClosed => self.on_closed(ev).await,
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "lifecycle-listener"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, JobSignal, JobSignalKind, StatsChange, StatsCollector};
    use crate::jobs::Job;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Engine double: records control requests, lets tests emit signals.
    struct FakeEngine {
        signals: broadcast::Sender<JobSignal>,
        stats: Arc<StatsCollector>,
        started: AtomicBool,
        stopped: AtomicBool,
        paused: AtomicBool,
    }

    impl FakeEngine {
        fn emit(&self, sig: JobSignal) {
            let _ = self.signals.send(sig);
        }
    }

    impl Engine for FakeEngine {
        fn signals(&self) -> broadcast::Receiver<JobSignal> {
            self.signals.subscribe()
        }

        fn stats_changes(&self) -> Option<broadcast::Receiver<StatsChange>> {
            Some(self.stats.changes())
        }

        fn start(&self, _ctx: CancellationToken) {
            self.started.store(true, Ordering::SeqCst);
        }

        fn stop(&self) {
            self.stopped.store(true, Ordering::SeqCst);
        }

        fn pause(&self) {
            self.paused.store(true, Ordering::SeqCst);
        }

        fn resume(&self) {
            self.paused.store(false, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct FakeFactory {
        engines: Mutex<HashMap<JobId, Arc<FakeEngine>>>,
    }

    impl FakeFactory {
        fn engine(&self, id: JobId) -> Arc<FakeEngine> {
            self.engines
                .lock()
                .expect("factory lock")
                .get(&id)
                .cloned()
                .expect("engine built for job")
        }
    }

    impl EngineFactory for FakeFactory {
        fn build(&self, _spec: &CrawlSpec, job: &Arc<Job>) -> Arc<dyn Engine> {
            let (tx, _rx) = broadcast::channel(64);
            let engine = Arc::new(FakeEngine {
                signals: tx,
                stats: Arc::clone(job.stats()),
                started: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                paused: AtomicBool::new(false),
            });
            self.engines
                .lock()
                .expect("factory lock")
                .insert(job.id(), Arc::clone(&engine));
            engine
        }
    }

    // Opt-in diagnostics: RUST_LOG=crawlvisor=debug cargo test
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn pool_with_factory() -> (CrawlerPool, Arc<FakeFactory>) {
        init_tracing();
        let factory = Arc::new(FakeFactory::default());
        let pool = CrawlerPool::builder(factory.clone()).build();
        (pool, factory)
    }

    /// Awaits `kind` on the canonical stream. Awaitable kinds reach the
    /// stream only after all listeners acked, so pool state is settled
    /// when this returns.
    async fn wait_for(rx: &mut broadcast::Receiver<Event>, kind: EventKind) -> Event {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                match rx.recv().await {
                    Ok(ev) if ev.kind == kind => return ev,
                    Ok(_) => continue,
                    Err(err) => panic!("event stream ended: {err}"),
                }
            }
        })
        .await
        .expect("event not observed in time")
    }

    /// Drives one job to the opened state.
    async fn open_job(
        pool: &CrawlerPool,
        factory: &FakeFactory,
        seed: &str,
    ) -> (JobId, Arc<FakeEngine>) {
        let mut rx = pool.events();
        let id = pool.start(CrawlSpec::new(seed)).await;
        let engine = factory.engine(id);
        engine.emit(JobSignal::new(JobSignalKind::EngineStarted));
        engine.emit(JobSignal::new(JobSignalKind::SpiderOpened));
        wait_for(&mut rx, EventKind::SpiderOpened).await;
        (id, engine)
    }

    fn status_of(views: &[JobView], id: JobId) -> &str {
        views
            .iter()
            .find(|v| v.id == id)
            .map(|v| &*v.status)
            .expect("job in snapshot")
    }

    #[tokio::test]
    async fn test_ids_strictly_increase_across_finished_jobs() {
        let (pool, factory) = pool_with_factory();

        let a = pool.start(CrawlSpec::new("one.example")).await;
        let b = pool.start(CrawlSpec::new("two.example")).await;
        assert!(b > a);

        // Finish job a, then keep allocating: ids never go back.
        let mut rx = pool.events();
        factory
            .engine(a)
            .emit(JobSignal::new(JobSignalKind::SpiderClosed).with_reason("finished"));
        wait_for(&mut rx, EventKind::SpiderClosed).await;

        let c = pool.start(CrawlSpec::new("three.example")).await;
        assert!(c > b);
        assert_eq!(c, JobId(3));
    }

    #[tokio::test]
    async fn test_unknown_id_fails_not_found() {
        let (pool, _factory) = pool_with_factory();
        let missing = JobId(42);

        assert!(matches!(
            pool.lookup(missing).await,
            Err(PoolError::NotFound { id }) if id == missing
        ));
        assert!(matches!(
            pool.stop(missing).await,
            Err(PoolError::NotFound { .. })
        ));
        assert!(matches!(
            pool.pause(missing).await,
            Err(PoolError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_resume_without_pause_fails_not_paused() {
        let (pool, _factory) = pool_with_factory();
        let id = pool.start(CrawlSpec::new("example.com")).await;

        let err = pool.resume(id).await.expect_err("never paused");
        assert!(matches!(err, PoolError::NotPaused { id: e } if e == id));
    }

    #[tokio::test]
    async fn test_status_before_spider_opens_is_unknown() {
        let (pool, _factory) = pool_with_factory();
        let id = pool.start(CrawlSpec::new("example.com")).await;

        let views = pool.snapshot().await;
        assert_eq!(status_of(&views, id), "unknown");
    }

    #[tokio::test]
    async fn test_two_job_scenario() {
        let (pool, factory) = pool_with_factory();

        let (a, _ea) = open_job(&pool, &factory, "example.com").await;
        let (b, eb) = open_job(&pool, &factory, "example.org").await;
        assert_eq!((a, b), (JobId(1), JobId(2)));

        // pause(1): suspended wins while both crawl flags are up.
        pool.pause(a).await.expect("pause");
        let views = pool.snapshot().await;
        assert_eq!(status_of(&views, a), "suspended");
        assert_eq!(status_of(&views, b), "crawling");

        // resume(1): status flips back.
        pool.resume(a).await.expect("resume");
        let views = pool.snapshot().await;
        assert_eq!(status_of(&views, a), "crawling");

        // stop(2): stopping until the close event lands.
        pool.stop(b).await.expect("stop");
        assert!(eb.stopped.load(Ordering::SeqCst));
        let views = pool.snapshot().await;
        assert_eq!(status_of(&views, b), "stopping");

        // Terminal close: job 2 migrates to the finished partition with
        // frozen stats.
        eb.stats.set_value("pages", 17);
        let mut rx = pool.events();
        eb.emit(JobSignal::new(JobSignalKind::SpiderClosing));
        eb.emit(JobSignal::new(JobSignalKind::SpiderClosed).with_reason("cancelled"));
        wait_for(&mut rx, EventKind::SpiderClosed).await;
        eb.stats.set_value("pages", 99); // post-close mutation must not leak

        let views = pool.snapshot().await;
        let active_ids: Vec<_> = pool.active_jobs().await.iter().map(|v| v.id).collect();
        assert_eq!(active_ids, vec![a]);

        let record = views.iter().find(|v| v.id == b).expect("archived view");
        assert_eq!(&*record.status, "cancelled");
        assert_eq!(record.stats.get("pages"), Some(&17));

        // No id in both partitions.
        let mut seen = HashSet::new();
        for v in &views {
            assert!(seen.insert(v.id), "id {} listed twice", v.id);
        }
    }

    #[tokio::test]
    async fn test_stop_outranks_suspend_for_paused_job() {
        let (pool, factory) = pool_with_factory();
        let (id, _engine) = open_job(&pool, &factory, "example.com").await;

        pool.pause(id).await.expect("pause");
        pool.stop(id).await.expect("stop");

        let views = pool.snapshot().await;
        assert_eq!(status_of(&views, id), "stopping");
    }

    #[tokio::test]
    async fn test_duplicate_close_produces_one_record() {
        let (pool, factory) = pool_with_factory();
        let (id, engine) = open_job(&pool, &factory, "example.com").await;

        let mut rx = pool.events();
        engine.emit(JobSignal::new(JobSignalKind::SpiderClosed).with_reason("finished"));
        engine.emit(JobSignal::new(JobSignalKind::SpiderClosed).with_reason("finished"));
        wait_for(&mut rx, EventKind::SpiderClosed).await;
        wait_for(&mut rx, EventKind::SpiderClosed).await;

        let finished = pool.finished_jobs().await;
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].id, id);
    }

    #[tokio::test]
    async fn test_closing_suspended_job_clears_suspended_marker() {
        let (pool, factory) = pool_with_factory();
        let (id, engine) = open_job(&pool, &factory, "example.com").await;

        pool.pause(id).await.expect("pause");
        assert!(pool.suspended.read().await.contains(&id));

        let mut rx = pool.events();
        engine.emit(JobSignal::new(JobSignalKind::SpiderClosed).with_reason("finished"));
        wait_for(&mut rx, EventKind::SpiderClosed).await;

        assert!(!pool.suspended.read().await.contains(&id));
        assert!(matches!(
            pool.resume(id).await,
            Err(PoolError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_stats_changes_surface_as_canonical_events() {
        let (pool, factory) = pool_with_factory();
        let (id, engine) = open_job(&pool, &factory, "example.com").await;

        let mut rx = pool.events();
        engine.stats.inc_value("item_scraped_count", 1);

        let ev = wait_for(&mut rx, EventKind::StatsChanged).await;
        assert_eq!(ev.job.id(), id);
        assert_eq!(ev.stat_key.as_deref(), Some("item_scraped_count"));
        assert_eq!(ev.stat_value, Some(1));
    }

    #[tokio::test]
    async fn test_payload_fields_pass_through_unchanged() {
        let (pool, factory) = pool_with_factory();
        let (_id, engine) = open_job(&pool, &factory, "example.com").await;

        let mut rx = pool.events();
        engine.emit(
            JobSignal::new(JobSignalKind::ResponseReceived)
                .with_url("https://example.com/page")
                .with_status(200)
                .with_bytes(4096),
        );

        let ev = wait_for(&mut rx, EventKind::ResponseReceived).await;
        assert_eq!(ev.url.as_deref(), Some("https://example.com/page"));
        assert_eq!(ev.status, Some(200));
        assert_eq!(ev.bytes, Some(4096));
    }

    #[tokio::test]
    async fn test_pause_marks_set_before_engine() {
        let (pool, factory) = pool_with_factory();
        let (id, engine) = open_job(&pool, &factory, "example.com").await;

        pool.pause(id).await.expect("pause");
        assert!(engine.paused.load(Ordering::SeqCst));
        pool.resume(id).await.expect("resume");
        assert!(!engine.paused.load(Ordering::SeqCst));

        // Second resume fails loudly.
        assert!(matches!(
            pool.resume(id).await,
            Err(PoolError::NotPaused { .. })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_stops_engines_and_monitor() {
        struct FlagMonitor {
            started: AtomicBool,
            stopped: AtomicBool,
        }
        impl ResourceMonitor for FlagMonitor {
            fn start(&self) {
                self.started.store(true, Ordering::SeqCst);
            }
            fn stop(&self) {
                self.stopped.store(true, Ordering::SeqCst);
            }
        }

        let factory = Arc::new(FakeFactory::default());
        let monitor = Arc::new(FlagMonitor {
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        });
        let pool = CrawlerPool::builder(factory.clone())
            .config(PoolConfig {
                grace: Duration::from_millis(50),
                ..PoolConfig::default()
            })
            .with_monitor(monitor.clone())
            .build();
        assert!(monitor.started.load(Ordering::SeqCst));

        let id = pool.start(CrawlSpec::new("example.com")).await;
        let engine = factory.engine(id);

        pool.shutdown().await;
        assert!(engine.stopped.load(Ordering::SeqCst));
        assert!(monitor.stopped.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_snapshot_partitions_stay_disjoint_during_close() {
        let (pool, factory) = pool_with_factory();

        for round in 0..200 {
            let (id, engine) = open_job(&pool, &factory, "example.com").await;
            engine.emit(JobSignal::new(JobSignalKind::SpiderClosed).with_reason("finished"));

            // Race snapshots against the close teardown running on the
            // listener worker.
            loop {
                let views = pool.snapshot().await;
                let mut seen = HashSet::new();
                for v in &views {
                    assert!(
                        seen.insert(v.id),
                        "round {round}: id {} listed in both partitions",
                        v.id
                    );
                }
                let archived = views
                    .iter()
                    .any(|v| v.id == id && &*v.status == "finished");
                if archived {
                    break;
                }
                tokio::task::yield_now().await;
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pause_racing_close_never_leaks_suspended_id() {
        let (pool, factory) = pool_with_factory();
        let pool = Arc::new(pool);

        for _ in 0..200 {
            let (id, engine) = open_job(&pool, &factory, "example.com").await;
            let mut rx = pool.events();

            let pauser = {
                let pool = Arc::clone(&pool);
                tokio::spawn(async move {
                    loop {
                        match pool.pause(id).await {
                            Ok(()) => tokio::task::yield_now().await,
                            Err(PoolError::NotFound { .. }) => break,
                            Err(err) => panic!("unexpected pause error: {err}"),
                        }
                    }
                })
            };

            engine.emit(JobSignal::new(JobSignalKind::SpiderClosed).with_reason("finished"));
            wait_for(&mut rx, EventKind::SpiderClosed).await;
            pauser.await.expect("pauser task");

            assert!(
                !pool.suspended.read().await.contains(&id),
                "closed job {id} left a suspended marker"
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_returns_as_soon_as_jobs_close() {
        let factory = Arc::new(FakeFactory::default());
        let pool = CrawlerPool::builder(factory.clone())
            .config(PoolConfig {
                grace: Duration::from_secs(30),
                ..PoolConfig::default()
            })
            .build();

        let id = pool.start(CrawlSpec::new("example.com")).await;
        let engine = factory.engine(id);

        // Engine double: acknowledge the stop request with a close signal.
        let closer = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                while !engine.stopped.load(Ordering::SeqCst) {
                    tokio::task::yield_now().await;
                }
                engine.emit(JobSignal::new(JobSignalKind::SpiderClosed).with_reason("shutdown"));
            })
        };

        let begin = std::time::Instant::now();
        pool.shutdown().await;
        closer.await.expect("closer task");

        assert!(pool.registry.is_empty().await);
        // Well under the 30s grace: the drain wait is woken by the close
        // listener, not a timer.
        assert!(begin.elapsed() < Duration::from_secs(5));
    }
}
