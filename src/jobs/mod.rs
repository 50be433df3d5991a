//! # Job domain types.
//!
//! This module provides the core job-related types:
//! - [`Job`], [`JobId`], [`SpiderRef`] — identity and published state
//! - [`CrawlSpec`] — creation input
//! - [`JobStatus`] and [`derive`] — pure status derivation
//! - [`FinishedJobs`], [`FinishedJob`] — the terminal archive
//! - [`JobView`] — the unified snapshot row

mod archive;
mod job;
mod spec;
mod status;
mod view;

pub use archive::{FinishedJob, FinishedJobs};
pub use job::{Job, JobId, SpiderRef};
pub use spec::CrawlSpec;
pub use status::{derive, JobStatus};
pub use view::JobView;
