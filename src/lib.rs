//! # retryvisor
//!
//! **Retryvisor** drives one fallible, resumable operation through a retry
//! schedule until it succeeds, gives up, or is stopped.
//!
//! At its heart is [`RetryCoordinator`], a pure state machine: it never
//! sleeps, spawns or locks. It starts attempts through an [`AttemptFactory`],
//! schedules wake-ups through a [`Timer`], and is fed [`Input`]s one at a
//! time through [`RetryCoordinator::deliver`]. The tokio driver
//! ([`RetryActor`], [`Retrier`]) plugs real tasks and sleeps into those seams.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐        ┌───────────────────────────────────────────────┐
//!   │  Attempt     │        │  Retrier (front-end)                          │
//!   │ (user code)  │──────► │  - RetryConfig (schedules, hold, timeout)     │
//!   └──────────────┘        │  - Bus (broadcast events)                     │
//!                           │  - SubscriberSet (fans out to subscribers)    │
//!                           └──────────────────────┬────────────────────────┘
//!                                                  ▼
//!                           ┌───────────────────────────────────────────────┐
//!                           │  RetryActor (tokio loop, one input at a time) │
//!                           │    stop token ─► Stop                         │
//!                           │    mpsc       ─► Completed / Tick             │
//!                           └──────────────────────┬────────────────────────┘
//!                                                  ▼ deliver(input)
//!                           ┌───────────────────────────────────────────────┐
//!                           │  RetryCoordinator (pure state machine)        │
//!                           │    AttemptFactory::start/stop ─► run_once     │
//!                           │    Timer::schedule/cancel     ─► sleep        │
//!                           └──────────────────────┬────────────────────────┘
//!                                                  ▼ publish(Event)
//!                                          Bus ─► listener ─► SubscriberSet
//! ```
//!
//! ### States
//! ```text
//! Initial ─Start─► Attempting ─Maybe─► Pausing ─Tick─► Attempting
//!                      │  └─Interrupted─► Holding ─Tick─► Resuming ─Maybe─► Resting ─Tick─► Resuming
//!                      │                                    (burst exhausted) ─► Glaring ─Tick─► Attempting
//!                      └─Stop─► Clearing ─Completed─► Terminated(Aborted)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                           |
//! |-------------------|--------------------------------------------------------------|----------------------------------------------|
//! | **Coordinator**   | Sans-IO retry state machine and its seams.                   | [`RetryCoordinator`], [`AttemptFactory`], [`Timer`] |
//! | **Schedules**     | Finite/infinite interval schedules with quantized jitter.    | [`IntervalSchedule`], [`IntervalIterator`], [`Jitter`] |
//! | **Attempts**      | Async, cancelable, resumable units of work.                  | [`Attempt`], [`AttemptFn`]                   |
//! | **Driver**        | Tokio wiring, per-attempt timeout, signal-driven shutdown.   | [`RetryActor`], [`Retrier`]                  |
//! | **Subscriber API**| Hook into the retry trace (logging, metrics, alerts).        | [`Subscribe`], [`Event`]                     |
//! | **Errors**        | Typed faults and runtime errors.                             | [`Fault`], [`ScheduleError`], [`RuntimeError`] |
//! | **Configuration** | Centralized driver settings.                                 | [`RetryConfig`]                              |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], forwarding events to `tracing`.
//! - `serde`: `Serialize`/`Deserialize` for [`IntervalSchedule`] and [`RetryConfig`].
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{AttemptFactory, Input, IntervalSchedule, Outcome, RetryCoordinator, Termination, Timer};
//!
//! #[derive(Default)]
//! struct Starts(u32);
//! impl AttemptFactory<()> for Starts {
//!     type Handle = u32;
//!     fn start(&mut self, _work: Option<()>) -> u32 { self.0 += 1; self.0 }
//!     fn stop(&mut self, _handle: &u32) {}
//! }
//!
//! #[derive(Default)]
//! struct Delays(Vec<Duration>);
//! impl Timer for Delays {
//!     fn schedule(&mut self, delay: Duration) { self.0.push(delay) }
//!     fn cancel(&mut self) {}
//! }
//!
//! let schedule = IntervalSchedule::new([Duration::from_millis(100)]);
//! let mut retry: RetryCoordinator<u8, (), _, _> =
//!     RetryCoordinator::new(Starts::default(), Delays::default(), schedule);
//!
//! assert_eq!(retry.deliver(Input::Start), None);
//! assert_eq!(retry.deliver(Input::Completed(Outcome::Maybe)), None);
//! assert_eq!(retry.timer().0, vec![Duration::from_millis(100)]);
//! assert_eq!(retry.deliver(Input::Tick), None);
//! assert_eq!(
//!     retry.deliver(Input::Completed(Outcome::Succeeded(42))),
//!     Some(Termination::Succeeded(42))
//! );
//! assert_eq!(retry.factory().0, 2);
//! ```

mod attempts;
mod config;
mod coordinator;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use attempts::{Attempt, AttemptFn, BoxAttemptFuture};
pub use config::RetryConfig;
pub use coordinator::{AttemptFactory, Input, Outcome, RetryCoordinator, State, Termination, Timer};
pub use core::{AttemptHandle, Retrier, RetrierBuilder, RetryActor, RetryParams};
pub use error::{Fault, RuntimeError, ScheduleError};
pub use events::{Bus, Event, EventKind};
pub use policies::{IntervalIterator, IntervalSchedule, Jitter};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: a built-in subscriber forwarding events to `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
