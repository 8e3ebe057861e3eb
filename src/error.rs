//! Error types used by the retry coordinator and its tokio driver.
//!
//! This module defines three enums:
//!
//! - [`Fault`]: the reason carried by [`Termination::Faulted`](crate::Termination::Faulted).
//! - [`ScheduleError`]: invalid input while building an [`IntervalSchedule`](crate::IntervalSchedule).
//! - [`RuntimeError`]: errors raised by the [`Retrier`](crate::Retrier) front-end itself.
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::any::Any;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// # Invariant violations that end a retry run.
///
/// A fault is never raised as a panic or returned from `deliver`; it is
/// reported through [`Termination::Faulted`](crate::Termination::Faulted).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// An attempt reported `Interrupted` but no hold duration was configured.
    #[error("no hold time specified")]
    NoHold,

    /// The driver's event queue closed before the run reached a termination.
    #[error("event channel closed before termination")]
    Disconnected,
}

impl Fault {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::Fault;
    ///
    /// assert_eq!(Fault::NoHold.as_label(), "fault_no_hold");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Fault::NoHold => "fault_no_hold",
            Fault::Disconnected => "fault_disconnected",
        }
    }
}

/// # Errors produced while building interval schedules.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// A step given in seconds was negative, NaN or infinite.
    #[error("invalid interval step {value}: must be finite and non-negative")]
    InvalidStep {
        /// The rejected value, in seconds.
        value: f64,
    },

    /// The randomization quantum was zero.
    #[error("randomization quantum must be greater than zero")]
    ZeroQuantum,

    /// The truncation factor was negative, NaN or infinite.
    #[error("invalid truncation factor {value}: must be finite and non-negative")]
    InvalidTruncation {
        /// The rejected factor.
        value: f64,
    },
}

impl ScheduleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ScheduleError::InvalidStep { .. } => "schedule_invalid_step",
            ScheduleError::ZeroQuantum => "schedule_zero_quantum",
            ScheduleError::InvalidTruncation { .. } => "schedule_invalid_truncation",
        }
    }
}

/// # Errors produced by the retry runtime.
///
/// These represent failures of the tokio front-end, never of an attempt:
/// attempt failures always surface as a [`Termination`](crate::Termination).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The configured schedules failed validation.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    /// OS signal listeners could not be registered.
    #[error("failed to register shutdown signal handlers: {0}")]
    Signal(#[source] io::Error),

    /// The in-flight attempt did not drain within the grace period after shutdown.
    #[error("shutdown timeout {grace:?} exceeded; attempt still in flight")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::InvalidSchedule(_) => "runtime_invalid_schedule",
            RuntimeError::Signal(_) => "runtime_signal",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::InvalidSchedule(e) => format!("schedule rejected: {e}"),
            RuntimeError::Signal(e) => format!("signal registration failed: {e}"),
            RuntimeError::GraceExceeded { grace } => {
                format!("grace exceeded after {grace:?}; attempt did not drain")
            }
        }
    }
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
