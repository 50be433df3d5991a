//! # Job: one running or completed crawl unit.
//!
//! A [`Job`] carries the identity and the published state the orchestration
//! layer derives status from: the `crawling` flag, the optional spider
//! reference, and the stats collector. All of it is safe for concurrent
//! read; the pool and its listeners are the only writers.
//!
//! ## Rules
//! - `id` and `seed` are assigned once at creation, never changed.
//! - `crawling` flips to `false` as soon as a stop is scheduled, before
//!   teardown completes.
//! - The spider reference is present only between `spider-opened` and the
//!   terminal `spider-closed`; its absence means the execution context does
//!   not exist (yet, or anymore).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::engine::StatsCollector;
use crate::jobs::CrawlSpec;

/// Unique job identifier, monotonically increasing per process, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a job's live execution context.
#[derive(Debug, Clone)]
pub struct SpiderRef {
    /// Spider name reported by the engine.
    pub name: Arc<str>,
    /// When the context was opened.
    pub opened_at: SystemTime,
}

/// One crawl unit tracked by the pool.
pub struct Job {
    id: JobId,
    seed: Arc<str>,
    external_id: Option<Arc<str>>,
    crawling: AtomicBool,
    spider: RwLock<Option<SpiderRef>>,
    stats: Arc<StatsCollector>,
}

impl Job {
    /// Creates a job with an assigned id from a creation spec.
    ///
    /// The job starts with `crawling = true`: the pool begins execution
    /// immediately after registration, and the flag only means "no stop
    /// scheduled yet".
    pub fn new(id: JobId, spec: &CrawlSpec) -> Arc<Self> {
        Arc::new(Self {
            id,
            seed: spec.seed().clone(),
            external_id: spec.external_id().cloned(),
            crawling: AtomicBool::new(true),
            spider: RwLock::new(None),
            stats: Arc::new(StatsCollector::default()),
        })
    }

    /// Returns the unique job id.
    #[inline]
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Returns the originating seed target.
    #[inline]
    pub fn seed(&self) -> &Arc<str> {
        &self.seed
    }

    /// Returns the caller-supplied opaque identifier, if any.
    #[inline]
    pub fn external_id(&self) -> Option<&Arc<str>> {
        self.external_id.as_ref()
    }

    /// Returns the job's statistics collector.
    ///
    /// The orchestration layer only reads it; the engine owns mutation.
    #[inline]
    pub fn stats(&self) -> &Arc<StatsCollector> {
        &self.stats
    }

    /// True while no stop has been scheduled.
    #[inline]
    pub fn is_crawling(&self) -> bool {
        self.crawling.load(Ordering::Acquire)
    }

    /// Sets the crawling flag.
    #[inline]
    pub fn set_crawling(&self, crawling: bool) {
        self.crawling.store(crawling, Ordering::Release);
    }

    /// True while the execution context exists.
    pub fn spider_present(&self) -> bool {
        self.spider
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Returns a copy of the spider reference, if present.
    pub fn spider(&self) -> Option<SpiderRef> {
        self.spider
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Attaches the execution context (on `spider-opened`).
    pub fn attach_spider(&self, name: Arc<str>) {
        let mut spider = self.spider.write().unwrap_or_else(|e| e.into_inner());
        *spider = Some(SpiderRef {
            name,
            opened_at: SystemTime::now(),
        });
    }

    /// Detaches the execution context (on terminal close).
    pub fn detach_spider(&self) -> Option<SpiderRef> {
        let mut spider = self.spider.write().unwrap_or_else(|e| e.into_inner());
        spider.take()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("seed", &self.seed)
            .field("crawling", &self.is_crawling())
            .field("spider_present", &self.spider_present())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spider_presence_tracks_attach_detach() {
        let job = Job::new(JobId(1), &CrawlSpec::new("example.com"));
        assert!(!job.spider_present());
        job.attach_spider(Arc::from("example.com"));
        assert!(job.spider_present());
        let taken = job.detach_spider();
        assert_eq!(taken.map(|s| s.name.to_string()).as_deref(), Some("example.com"));
        assert!(!job.spider_present());
    }
}
