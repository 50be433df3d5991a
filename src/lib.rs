//! # Crawlvisor
//!
//! An event-driven orchestrator for a pool of crawl jobs.
//!
//! Crawlvisor owns the job lifecycle around an injected crawl engine: it
//! allocates unique job ids, tracks each job's derived status
//! (`unknown` / `stopping` / `suspended` / `crawling`), folds every job's
//! lifecycle signals and statistics changes into one ordered canonical
//! event stream tagged with the job back-reference, and archives finished
//! jobs with their frozen final counters.
//!
//! ## Architecture
//! ```text
//!   CrawlerPool
//!     ├── IdAllocator          unique, monotonically increasing job ids
//!     ├── Registry             JobId -> JobHandle (job, engine, cancel)
//!     ├── suspended set        ids with a pause in effect
//!     ├── FinishedJobs         terminal archive, most recent first
//!     ├── SignalMapper         per-job listeners -> canonical Events
//!     ├── ResourceMonitor      process CPU/memory sampling seam
//!     └── SignalHub
//!           ├── SubscriberSet  per-subscriber queue + worker (isolated)
//!           └── Bus            ordered broadcast stream
//! ```
//!
//! Engines are supplied through [`EngineFactory`]; the pool never depends
//! on a concrete crawler. Each engine reports [`JobSignal`]s on its own
//! stream and mutates its job's [`StatsCollector`]; the mapper republishes
//! both as [`Event`]s on the hub.
//!
//! ## Dispatch modes
//! A fixed subset of event kinds ([`EventKind::is_awaitable`]) is
//! dispatched *awaited*: every subscriber processes the event before it
//! appears on the stream, so an observer that sees `spider-closed` can rely
//! on the finished record already existing. All other kinds are
//! fire-and-forget. Subscriber failures and panics are isolated either way.
//!
//! ## Quickstart
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tokio::sync::broadcast;
//! use tokio_util::sync::CancellationToken;
//!
//! use crawlvisor::{CrawlSpec, CrawlerPool, Engine, EngineFactory, Job, JobSignal};
//!
//! struct MyEngine {
//!     signals: broadcast::Sender<JobSignal>,
//! }
//!
//! impl Engine for MyEngine {
//!     fn signals(&self) -> broadcast::Receiver<JobSignal> {
//!         self.signals.subscribe()
//!     }
//!     fn start(&self, _ctx: CancellationToken) { /* launch the crawl */ }
//!     fn stop(&self) {}
//!     fn pause(&self) {}
//!     fn resume(&self) {}
//! }
//!
//! struct MyFactory;
//!
//! impl EngineFactory for MyFactory {
//!     fn build(&self, _spec: &CrawlSpec, _job: &Arc<Job>) -> Arc<dyn Engine> {
//!         let (tx, _rx) = broadcast::channel(64);
//!         Arc::new(MyEngine { signals: tx })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = CrawlerPool::builder(Arc::new(MyFactory)).build();
//!     let id = pool.start(CrawlSpec::new("https://example.com")).await;
//!
//!     let mut events = pool.events();
//!     while let Ok(ev) = events.recv().await {
//!         println!("job {} event {}", ev.job.id(), ev.kind.as_label());
//!     }
//!
//!     let _ = pool.stop(id).await;
//!     pool.shutdown().await;
//! }
//! ```
//!
//! ## Feature flags
//! - `logging` — enables [`LogWriter`], a demo subscriber that emits every
//!   canonical event through `tracing`.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod events;
pub mod jobs;
pub mod monitor;
pub mod subscribers;

pub use config::PoolConfig;
pub use crate::core::{CrawlerPool, CrawlerPoolBuilder, IdAllocator, JobHandle, Registry};
pub use engine::{Engine, EngineFactory, JobSignal, JobSignalKind, StatsChange, StatsCollector};
pub use error::{ListenerError, PoolError};
pub use events::{Bus, Event, EventKind, SignalHub, SignalTable};
pub use jobs::{
    CrawlSpec, FinishedJob, FinishedJobs, Job, JobId, JobStatus, JobView, SpiderRef,
};
pub use monitor::{IntervalMonitor, NoopMonitor, ProcessSample, ResourceMonitor, Sampler};
pub use subscribers::{Subscribe, SubscriberSet};

#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
