//! # Retry runtime configuration.
//!
//! [`RetryConfig`] collects the settings a [`Retrier`](crate::Retrier) needs:
//! the burst and glare schedules, the hold time, the per-attempt timeout,
//! the shutdown grace and the event bus capacity.
//!
//! ## Sentinel values
//! - `timeout = 0s` → no timeout
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::core::RetryParams;
use crate::error::ScheduleError;
use crate::policies::IntervalSchedule;

/// Configuration for a [`Retrier`](crate::Retrier).
///
/// All fields are public. Prefer the helper accessors over checking the
/// sentinel zeros directly.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    /// Burst schedule: delays between transient failures.
    pub schedule: IntervalSchedule,

    /// Glare schedule: delays between exhausted bursts. `None` ends the run
    /// with `Exhausted` once the burst runs out.
    pub repeat: Option<IntervalSchedule>,

    /// Wait after an interrupted attempt before resuming it.
    ///
    /// `None` turns an interruption into `Faulted(NoHold)`.
    pub hold: Option<Duration>,

    /// Per-attempt timeout (`Duration::ZERO` = none). Expiry counts as `Maybe`.
    pub timeout: Duration,

    /// How long [`Retrier::run_until_signal`](crate::Retrier::run_until_signal)
    /// waits for the in-flight attempt to drain after a shutdown signal.
    pub grace: Duration,

    /// Capacity of the event bus ring buffer.
    pub bus_capacity: usize,
}

impl RetryConfig {
    /// Returns the per-attempt timeout, or `None` when it is zero.
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout.is_zero() {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks both schedules.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.schedule.validate()?;
        if let Some(repeat) = &self.repeat {
            repeat.validate()?;
        }
        Ok(())
    }

    /// Extracts the per-run parameters for a [`RetryActor`](crate::RetryActor).
    pub fn params(&self) -> RetryParams {
        RetryParams {
            schedule: self.schedule.clone(),
            repeat: self.repeat.clone(),
            hold: self.hold,
            timeout: self.default_timeout(),
        }
    }
}

impl Default for RetryConfig {
    /// Defaults:
    ///
    /// - `schedule`: 0.5s, 1s, 2s, 4s, randomized by 0.25s, truncated at 0.5
    /// - `repeat = None`, `hold = None`
    /// - `timeout = 0s` (none)
    /// - `grace = 60s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            schedule: IntervalSchedule::new([
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ])
            .with_randomized(Duration::from_millis(250))
            .with_truncated(0.5),
            repeat: None,
            hold: None,
            timeout: Duration::ZERO,
            grace: Duration::from_secs(60),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_sentinels() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.default_timeout(), None);
        assert_eq!(cfg.grace, Duration::from_secs(60));
        assert_eq!(cfg.schedule.natural_len(), Some(4));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_bus_capacity_is_clamped() {
        let cfg = RetryConfig {
            bus_capacity: 0,
            ..RetryConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn invalid_repeat_schedule_fails_validation() {
        let cfg = RetryConfig {
            repeat: Some(IntervalSchedule::regular(Duration::from_secs(10)).with_randomized(Duration::ZERO)),
            ..RetryConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ScheduleError::ZeroQuantum));
    }

    #[test]
    fn params_carry_timeout_and_hold() {
        let cfg = RetryConfig {
            timeout: Duration::from_secs(3),
            hold: Some(Duration::from_secs(5)),
            ..RetryConfig::default()
        };
        let params = cfg.params();
        assert_eq!(params.timeout, Some(Duration::from_secs(3)));
        assert_eq!(params.hold, Some(Duration::from_secs(5)));
        assert!(params.repeat.is_none());
    }
}
