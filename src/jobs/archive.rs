//! # Finished-job archive.
//!
//! On terminal closure the pool's close listener snapshots a job's
//! identity, seed, close reason and final statistics into a
//! [`FinishedJob`] record. The archive is append-only and most-recent-first
//! (head insertion), so a "recent jobs" view never needs re-sorting, and it
//! outlives the job's own in-memory state: after closure it is the durable
//! source of truth.
//!
//! ## Rules
//! - Exactly one record per job id: a duplicate attempt returns
//!   [`PoolError::DuplicateRecord`] and changes nothing. Some engines emit
//!   close signals more than once under error conditions.
//! - Records are immutable; stats are frozen at record time.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::PoolError;
use crate::jobs::{Job, JobId};

/// Immutable snapshot of one terminally closed job.
#[derive(Debug, Clone)]
pub struct FinishedJob {
    /// The job's unique id.
    pub id: JobId,
    /// Caller-supplied opaque identifier, if any.
    pub external_id: Option<Arc<str>>,
    /// The originating seed target.
    pub seed: Arc<str>,
    /// Close reason reported by the engine (e.g. `"finished"`, `"cancelled"`).
    pub status: Arc<str>,
    /// Final statistics, frozen at record time.
    pub stats: HashMap<String, i64>,
}

/// Append-only, most-recent-first archive of finished jobs.
pub struct FinishedJobs {
    records: RwLock<Vec<FinishedJob>>,
}

impl FinishedJobs {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Records a terminal snapshot for `job`, inserted at the head.
    ///
    /// Idempotent per id: a second attempt for the same job returns
    /// [`PoolError::DuplicateRecord`] and leaves the archive unchanged.
    pub async fn record(&self, job: &Job, reason: Arc<str>) -> Result<(), PoolError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == job.id()) {
            return Err(PoolError::DuplicateRecord { id: job.id() });
        }
        records.insert(
            0,
            FinishedJob {
                id: job.id(),
                external_id: job.external_id().cloned(),
                seed: job.seed().clone(),
                status: reason,
                stats: job.stats().snapshot(),
            },
        );
        Ok(())
    }

    /// True if a record exists for `id`.
    pub async fn contains(&self, id: JobId) -> bool {
        self.records.read().await.iter().any(|r| r.id == id)
    }

    /// Returns the set of finished ids, for snapshot partition filtering.
    pub async fn ids(&self) -> HashSet<JobId> {
        self.records.read().await.iter().map(|r| r.id).collect()
    }

    /// Returns all records, most recent first.
    pub async fn list(&self) -> Vec<FinishedJob> {
        self.records.read().await.clone()
    }
}

impl Default for FinishedJobs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::CrawlSpec;

    #[tokio::test]
    async fn test_duplicate_record_is_rejected() {
        let archive = FinishedJobs::new();
        let job = Job::new(JobId(1), &CrawlSpec::new("example.com"));

        archive
            .record(&job, Arc::from("finished"))
            .await
            .expect("first record");
        let err = archive
            .record(&job, Arc::from("finished"))
            .await
            .expect_err("second record must be rejected");
        assert_eq!(err.as_label(), "pool_duplicate_record");

        assert_eq!(archive.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_most_recent_first() {
        let archive = FinishedJobs::new();
        let first = Job::new(JobId(1), &CrawlSpec::new("example.com"));
        let second = Job::new(JobId(2), &CrawlSpec::new("example.org"));

        archive.record(&first, Arc::from("finished")).await.unwrap();
        archive.record(&second, Arc::from("cancelled")).await.unwrap();

        let records = archive.list().await;
        assert_eq!(records[0].id, JobId(2));
        assert_eq!(records[1].id, JobId(1));
    }

    #[tokio::test]
    async fn test_stats_are_frozen_at_record_time() {
        let archive = FinishedJobs::new();
        let job = Job::new(JobId(7), &CrawlSpec::new("example.net"));
        job.stats().set_value("pages", 12);

        archive.record(&job, Arc::from("finished")).await.unwrap();
        job.stats().set_value("pages", 99);

        let records = archive.list().await;
        assert_eq!(records[0].stats.get("pages"), Some(&12));
    }
}
