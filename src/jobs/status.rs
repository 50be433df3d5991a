//! # Logical job status derivation.
//!
//! A pure function of already-published state — whether the execution
//! context exists, the `crawling` flag, and suspended-set membership — to a
//! status label. No side effects, no locks held across the decision.
//!
//! ## Decision order (first match wins)
//! 1. no execution context yet → `Unknown`
//! 2. `crawling == false` → `Stopping` (stop scheduled, teardown in flight)
//! 3. id in suspended set → `Suspended`
//! 4. otherwise → `Crawling`
//!
//! Stop outranks suspend deliberately: a job that was paused and then told
//! to stop must report `Stopping`, the more terminal state — an observer
//! must not offer "resume" controls for a job that is shutting down.

/// Logical status of an active job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// The execution context does not exist yet (or was torn down).
    Unknown,
    /// A stop has been scheduled; teardown may still be in flight.
    Stopping,
    /// The job is paused.
    Suspended,
    /// The job is actively crawling.
    Crawling,
}

impl JobStatus {
    /// Returns a short stable label for views and logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            JobStatus::Unknown => "unknown",
            JobStatus::Stopping => "stopping",
            JobStatus::Suspended => "suspended",
            JobStatus::Crawling => "crawling",
        }
    }
}

/// Derives the logical status from the three published state inputs.
pub fn derive(spider_present: bool, crawling: bool, suspended: bool) -> JobStatus {
    if !spider_present {
        return JobStatus::Unknown;
    }
    if !crawling {
        return JobStatus::Stopping;
    }
    if suspended {
        return JobStatus::Suspended;
    }
    JobStatus::Crawling
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_context_is_unknown() {
        assert_eq!(derive(false, true, false), JobStatus::Unknown);
        // Even a paused or stopping job without a context reads unknown.
        assert_eq!(derive(false, false, true), JobStatus::Unknown);
    }

    #[test]
    fn test_stop_outranks_suspend() {
        assert_eq!(derive(true, false, true), JobStatus::Stopping);
        assert_eq!(derive(true, false, false), JobStatus::Stopping);
    }

    #[test]
    fn test_suspended_then_crawling() {
        assert_eq!(derive(true, true, true), JobStatus::Suspended);
        assert_eq!(derive(true, true, false), JobStatus::Crawling);
    }

    #[test]
    fn test_labels() {
        assert_eq!(JobStatus::Stopping.as_label(), "stopping");
        assert_eq!(JobStatus::Suspended.as_label(), "suspended");
    }
}
