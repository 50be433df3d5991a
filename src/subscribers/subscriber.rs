//! # Core subscriber trait.
//!
//! `Subscribe` is the extension point for plugging event handlers into the
//! pool: archivers, loggers, UI feeds, metrics. Each subscriber is driven
//! by a dedicated worker loop fed by a bounded queue owned by the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) — they do **not** block
//!   the publisher nor other subscribers.
//! - A returned `Err` is a listener failure: logged for fire-and-forget
//!   dispatch, collected and reported to the awaiting emitter for
//!   awaitable dispatch. It never aborts the emitting job or other
//!   listeners.
//! - A subscriber may override the set-wide default queue capacity via
//!   [`Subscribe::queue_capacity`]. On overflow, fire-and-forget events for
//!   that subscriber are dropped (warn); awaitable deliveries are never
//!   dropped.

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::Event;

/// Contract for canonical-event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should
/// avoid blocking the async runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single canonical event.
    async fn on_event(&self, event: &Event) -> Result<(), ListenerError>;

    /// Human-readable name (for logs and failure reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Overrides the set-wide default capacity for this subscriber's queue.
    fn queue_capacity(&self) -> Option<usize> {
        None
    }
}
