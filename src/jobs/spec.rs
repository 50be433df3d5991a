//! # Job creation input.
//!
//! [`CrawlSpec`] describes one crawl to run: the seed target, an optional
//! caller-supplied external id, and opaque engine settings. The pool's only
//! concern with it is id injection and identity bookkeeping; the settings
//! map belongs to the engine collaborator.

use std::collections::HashMap;
use std::sync::Arc;

/// Specification for starting one crawl job.
///
/// ## Example
/// ```
/// use crawlvisor::CrawlSpec;
///
/// let spec = CrawlSpec::new("example.com")
///     .with_external_id("job-55d")
///     .with_setting("depth_limit", "3");
///
/// assert_eq!(&**spec.seed(), "example.com");
/// assert_eq!(spec.setting("depth_limit"), Some("3"));
/// ```
#[derive(Debug, Clone)]
pub struct CrawlSpec {
    seed: Arc<str>,
    external_id: Option<Arc<str>>,
    settings: HashMap<String, String>,
}

impl CrawlSpec {
    /// Creates a spec for the given seed target.
    pub fn new(seed: impl Into<Arc<str>>) -> Self {
        Self {
            seed: seed.into(),
            external_id: None,
            settings: HashMap::new(),
        }
    }

    /// Attaches a caller-supplied opaque identifier.
    pub fn with_external_id(mut self, id: impl Into<Arc<str>>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Adds one opaque engine setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Returns the seed target.
    pub fn seed(&self) -> &Arc<str> {
        &self.seed
    }

    /// Returns the external id, if supplied.
    pub fn external_id(&self) -> Option<&Arc<str>> {
        self.external_id.as_ref()
    }

    /// Returns one engine setting by key.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Returns the full settings map.
    pub fn settings(&self) -> &HashMap<String, String> {
        &self.settings
    }
}
