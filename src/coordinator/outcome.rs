//! # Values exchanged with the coordinator.
//!
//! - [`Input`]       events delivered to the coordinator
//! - [`Outcome`]     what one attempt reports
//! - [`Termination`] what the coordinator reports, exactly once

use crate::error::Fault;

/// Result reported by one attempt.
///
/// `V` is the success value, `W` the opaque partial-work payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<V, W> {
    /// Failed transiently; worth retrying.
    Maybe,
    /// Failed permanently; stop.
    Cannot(String),
    /// Paused with partial state; resume later with it.
    Interrupted(W),
    /// Completed; the coordinator finishes with this value.
    Succeeded(V),
}

impl<V, W> Outcome<V, W> {
    /// Shorthand for [`Outcome::Cannot`].
    pub fn cannot(reason: impl Into<String>) -> Self {
        Outcome::Cannot(reason.into())
    }

    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Maybe => "maybe",
            Outcome::Cannot(_) => "cannot",
            Outcome::Interrupted(_) => "interrupted",
            Outcome::Succeeded(_) => "succeeded",
        }
    }
}

/// Final report of a retry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination<V> {
    /// Passed through from a successful attempt.
    Succeeded(V),
    /// Passed through from an attempt that failed permanently.
    Cannot(String),
    /// The attempt schedule and the repeat schedule were fully consumed.
    Exhausted,
    /// The caller stopped the run.
    Aborted,
    /// An invariant was violated.
    Faulted(Fault),
}

impl<V> Termination<V> {
    /// Returns a short stable label for logs/metrics.
    ///
    /// ```
    /// use retryvisor::Termination;
    ///
    /// assert_eq!(Termination::<()>::Exhausted.as_label(), "exhausted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Termination::Succeeded(_) => "succeeded",
            Termination::Cannot(_) => "cannot",
            Termination::Exhausted => "exhausted",
            Termination::Aborted => "aborted",
            Termination::Faulted(_) => "faulted",
        }
    }

    /// Returns a label with the reason appended for `Cannot` and `Faulted`.
    pub fn as_message(&self) -> String {
        match self {
            Termination::Cannot(reason) => format!("cannot: {reason}"),
            Termination::Faulted(fault) => format!("faulted: {fault}"),
            other => other.as_label().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Termination::Succeeded(_))
    }

    /// Returns the success value, if any.
    pub fn into_value(self) -> Option<V> {
        match self {
            Termination::Succeeded(v) => Some(v),
            _ => None,
        }
    }
}

/// Event delivered to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<V, W> {
    /// Begin.
    Start,
    /// The current attempt finished.
    Completed(Outcome<V, W>),
    /// The requested delay elapsed.
    Tick,
    /// The caller requests shutdown.
    Stop,
}

impl<V, W> Input<V, W> {
    /// Short label for traces and logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Input::Start => "start",
            Input::Completed(_) => "completed",
            Input::Tick => "tick",
            Input::Stop => "stop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_messages_include_reasons() {
        assert_eq!(
            Termination::<u8>::Cannot("nope".into()).as_message(),
            "cannot: nope"
        );
        assert_eq!(
            Termination::<u8>::Faulted(Fault::NoHold).as_message(),
            "faulted: no hold time specified"
        );
        assert_eq!(Termination::<u8>::Aborted.as_message(), "aborted");
    }

    #[test]
    fn into_value_only_for_success() {
        assert_eq!(Termination::Succeeded(42).into_value(), Some(42));
        assert_eq!(Termination::<i32>::Exhausted.into_value(), None);
        assert!(Termination::Succeeded(()).is_success());
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::<(), ()>::Maybe.as_label(), "maybe");
        assert_eq!(Outcome::<(), &str>::Interrupted("half").as_label(), "interrupted");
        assert_eq!(Outcome::<(), ()>::cannot("x"), Outcome::Cannot("x".to_string()));
    }
}
