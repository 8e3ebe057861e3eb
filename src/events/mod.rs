//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `RetryCoordinator` (transitions), `runner::run_once`
//!   (completion/timeout/panic), `Retrier` (shutdown), `SubscriberSet`
//!   workers (overflow/panic).
//! - **Consumers**: the `Retrier` listener, which fans out to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
