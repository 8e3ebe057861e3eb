//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for plugging custom handlers into the
//! event stream of a [`Retrier`](crate::Retrier).
//!
//! ```text
//! SubscriberSet ──► [bounded queue] ──► worker task ──► subscriber.on_event()
//!                                    └─► panic caught → EventKind::SubscriberPanicked
//! ```
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only** and publishes
//!   `EventKind::SubscriberOverflow`.
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use retryvisor::{Event, EventKind, Subscribe};
//!
//! struct GlareCounter;
//!
//! #[async_trait]
//! impl Subscribe for GlareCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::GlareScheduled) {
//!             // bump a counter, page someone, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "glare-counter" }
//!     fn queue_capacity(&self) -> usize { 64 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for retry observability.
///
/// Implementations should use async I/O and handle their own errors;
/// a panic is caught and reported but the event is lost.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event, called from this subscriber's worker task.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic events.
    ///
    /// The default uses `type_name::<Self>()`; override it with something short.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity (clamped to at least 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
