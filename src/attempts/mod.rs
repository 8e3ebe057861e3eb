//! # Attempt abstractions.
//!
//! - [`Attempt`] - trait for async, cancelable, resumable tries
//! - [`AttemptFn`] - closure-backed implementation
//! - [`BoxAttemptFuture`] - the future one try produces

mod attempt;
mod attempt_fn;

pub use attempt::{Attempt, BoxAttemptFuture};
pub use attempt_fn::AttemptFn;
