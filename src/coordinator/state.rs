//! Coordinator states.
//!
//! ```text
//! Initial    ──Start──────────────► Attempting
//! Attempting ──Maybe (delay)──────► Pausing    ──Tick──► Attempting
//! Attempting ──Maybe (exhausted)──► Glaring    ──Tick──► Attempting (fresh burst)
//! Attempting ──Interrupted────────► Holding    ──Tick──► Resuming   (fresh burst)
//! Resuming   ──Maybe (delay)──────► Resting    ──Tick──► Resuming
//! Attempting/Resuming ──Stop──────► Clearing   ──Completed──► Aborted
//! ```

/// Where the coordinator is in its attempt → wait → attempt cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Created, waiting for `Start`.
    Initial,
    /// An ordinary attempt is in flight.
    Attempting,
    /// Waiting between two ordinary attempts.
    Pausing,
    /// Waiting before resuming interrupted work.
    Holding,
    /// A resumption attempt is in flight.
    Resuming,
    /// Waiting between two resumption attempts.
    Resting,
    /// Waiting between an exhausted burst and the next one.
    Glaring,
    /// Stop was forwarded; draining the in-flight attempt.
    Clearing,
    /// A termination was delivered; further input is ignored.
    Terminated,
}

impl State {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            State::Initial => "initial",
            State::Attempting => "attempting",
            State::Pausing => "pausing",
            State::Holding => "holding",
            State::Resuming => "resuming",
            State::Resting => "resting",
            State::Glaring => "glaring",
            State::Clearing => "clearing",
            State::Terminated => "terminated",
        }
    }

    /// States that own an in-flight attempt.
    pub fn has_attempt(&self) -> bool {
        matches!(self, State::Attempting | State::Resuming | State::Clearing)
    }

    /// States that wait for a `Tick`.
    pub fn awaits_tick(&self) -> bool {
        matches!(
            self,
            State::Pausing | State::Holding | State::Resting | State::Glaring
        )
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}
