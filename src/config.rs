//! # Global pool configuration.
//!
//! Provides [`PoolConfig`], centralized settings for the crawl job pool.
//!
//! ## Sentinel values
//! - `grace = 0s` → no wait during shutdown (engines are told to stop and
//!   the runtime token is cancelled immediately)
//! - `bus_capacity` is clamped to a minimum of 1 by the bus

use std::time::Duration;

/// Global configuration for the crawl job pool.
///
/// ## Field semantics
/// - `bus_capacity`: canonical event stream ring buffer size (min 1)
/// - `grace`: maximum wait for engines to wind down during `shutdown()`
/// - `subscriber_queue`: default per-subscriber queue capacity
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Capacity of the canonical event broadcast channel ring buffer.
    ///
    /// Slow stream observers that lag behind more than `bus_capacity`
    /// events will observe `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Maximum time `shutdown()` waits for engines after telling them to stop.
    ///
    /// `Duration::ZERO` means no wait.
    pub grace: Duration,

    /// Default bounded queue capacity for each registered subscriber.
    pub subscriber_queue: usize,
}

impl PoolConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the shutdown grace as an `Option`.
    ///
    /// - `None` → no wait
    /// - `Some(d)` → wait up to `d`
    #[inline]
    pub fn shutdown_grace(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }
}

impl Default for PoolConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `grace = 5s`
    /// - `subscriber_queue = 1024`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            grace: Duration::from_secs(5),
            subscriber_queue: 1024,
        }
    }
}
