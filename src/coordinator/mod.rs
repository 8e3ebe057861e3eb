//! Retry coordinator: pure state machine and its seams.
//!
//! ## Contents
//! - [`RetryCoordinator`] the state machine (`deliver(input) -> Option<Termination>`)
//! - [`AttemptFactory`], [`Timer`] seams the coordinator drives
//! - [`Input`], [`Outcome`], [`Termination`], [`State`] the values it exchanges
//!
//! The coordinator does no I/O. [`RetryActor`](crate::RetryActor) wires it to
//! tokio; tests wire it to recording doubles.

mod machine;
mod outcome;
mod state;


pub use machine::{AttemptFactory, RetryCoordinator, Timer};
pub use outcome::{Input, Outcome, Termination};
pub use state::State;
