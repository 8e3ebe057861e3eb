//! Tokio driver for the retry coordinator.
//!
//! - [`runner`]: executes one attempt with timeout, panic capture and event publishing;
//! - [`actor`]: wires a [`RetryCoordinator`](crate::RetryCoordinator) to spawned attempts and sleeping timers;
//! - [`retrier`]: front-end owning config, bus and subscribers, with signal-driven shutdown;
//! - [`shutdown`]: cross-platform termination signal handling.

mod actor;
mod retrier;
mod runner;
mod shutdown;

pub use actor::{AttemptHandle, RetryActor, RetryParams};
pub use retrier::{Retrier, RetrierBuilder};
