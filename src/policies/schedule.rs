//! # Interval schedules.
//!
//! [`IntervalSchedule`] describes the delays between attempts:
//! - [`first_steps`](IntervalSchedule::first_steps): explicit opening delays, in order;
//! - [`regular_steps`](IntervalSchedule::regular_steps): delay repeated once the first steps run out;
//! - [`step_limit`](IntervalSchedule::step_limit): cap on the total number of delays;
//! - [`randomized`](IntervalSchedule::randomized) / [`truncated`](IntervalSchedule::truncated):
//!   quantized jitter (see [`Jitter`](crate::policies::Jitter)).
//!
//! ```text
//! first_steps=[1s, 2s], regular=5s, limit=4  →  1s, 2s, 5s, 5s
//! first_steps=[1s, 2s], regular=None         →  1s, 2s
//! first_steps=[],       regular=5s           →  5s, 5s, 5s, ... (infinite)
//! ```
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::IntervalSchedule;
//!
//! let schedule = IntervalSchedule::new([Duration::from_millis(100), Duration::from_millis(200)])
//!     .with_regular_steps(Duration::from_secs(1))
//!     .with_step_limit(4);
//!
//! let delays: Vec<_> = schedule.iter().collect();
//! assert_eq!(
//!     delays,
//!     vec![
//!         Duration::from_millis(100),
//!         Duration::from_millis(200),
//!         Duration::from_secs(1),
//!         Duration::from_secs(1),
//!     ]
//! );
//! ```

use std::time::Duration;

use crate::error::ScheduleError;
use crate::policies::intervals::IntervalIterator;

/// Immutable description of the delays between attempts.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IntervalSchedule {
    first_steps: Vec<Duration>,
    regular_steps: Option<Duration>,
    step_limit: Option<usize>,
    randomized: Option<Duration>,
    truncated: Option<f64>,
}

impl IntervalSchedule {
    /// Creates a schedule from explicit opening delays.
    pub fn new(first_steps: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            first_steps: first_steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Creates an infinite schedule that repeats `step` forever.
    pub fn regular(step: Duration) -> Self {
        Self::default().with_regular_steps(step)
    }

    /// Creates a schedule from opening delays given in seconds.
    ///
    /// Fails with [`ScheduleError::InvalidStep`] on negative or non-finite values.
    pub fn from_secs(first_steps: &[f64]) -> Result<Self, ScheduleError> {
        let steps = first_steps
            .iter()
            .map(|&value| {
                Duration::try_from_secs_f64(value).map_err(|_| ScheduleError::InvalidStep { value })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(steps))
    }

    /// Creates a schedule of `steps` exponentially growing delays.
    ///
    /// Step `n` (0-indexed) is `first × factor^n`, clamped to `max`. Growth
    /// that overflows or goes negative clamps to `max` as well.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use retryvisor::IntervalSchedule;
    ///
    /// let s = IntervalSchedule::exponential(
    ///     Duration::from_millis(100),
    ///     2.0,
    ///     Duration::from_millis(500),
    ///     4,
    /// );
    /// assert_eq!(
    ///     s.first_steps(),
    ///     &[
    ///         Duration::from_millis(100),
    ///         Duration::from_millis(200),
    ///         Duration::from_millis(400),
    ///         Duration::from_millis(500),
    ///     ]
    /// );
    /// ```
    pub fn exponential(first: Duration, factor: f64, max: Duration, steps: usize) -> Self {
        Self::new((0..steps).map(|n| backoff_step(first, factor, max, n)))
    }

    /// Sets the delay repeated after the first steps are used up.
    #[must_use]
    pub fn with_regular_steps(mut self, step: Duration) -> Self {
        self.regular_steps = Some(step);
        self
    }

    /// Caps the total number of emitted delays (first steps included).
    #[must_use]
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Enables quantized jitter with the given quantum.
    #[must_use]
    pub fn with_randomized(mut self, quantum: Duration) -> Self {
        self.randomized = Some(quantum);
        self
    }

    /// Bounds jitter to `factor × base` (defaults to the base itself).
    #[must_use]
    pub fn with_truncated(mut self, factor: f64) -> Self {
        self.truncated = Some(factor);
        self
    }

    pub fn first_steps(&self) -> &[Duration] {
        &self.first_steps
    }

    pub fn regular_steps(&self) -> Option<Duration> {
        self.regular_steps
    }

    pub fn step_limit(&self) -> Option<usize> {
        self.step_limit
    }

    pub fn randomized(&self) -> Option<Duration> {
        self.randomized
    }

    pub fn truncated(&self) -> Option<f64> {
        self.truncated
    }

    /// Returns `true` if the schedule never runs out of delays.
    pub fn is_infinite(&self) -> bool {
        self.regular_steps.is_some() && self.step_limit.is_none()
    }

    /// Number of delays the schedule yields, or `None` if infinite.
    pub fn natural_len(&self) -> Option<usize> {
        match (self.regular_steps, self.step_limit) {
            (None, None) => Some(self.first_steps.len()),
            (None, Some(limit)) => Some(self.first_steps.len().min(limit)),
            (Some(_), Some(limit)) => Some(limit),
            (Some(_), None) => None,
        }
    }

    /// Checks jitter parameters.
    ///
    /// A schedule with no steps at all is valid: it exhausts immediately.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.randomized.is_some_and(|q| q.is_zero()) {
            return Err(ScheduleError::ZeroQuantum);
        }
        if let Some(value) = self.truncated {
            if !value.is_finite() || value < 0.0 {
                return Err(ScheduleError::InvalidTruncation { value });
            }
        }
        Ok(())
    }

    /// Starts a lazy, single-pass iterator over the delays.
    pub fn iter(&self) -> IntervalIterator {
        IntervalIterator::new(self)
    }
}

impl<'a> IntoIterator for &'a IntervalSchedule {
    type Item = Duration;
    type IntoIter = IntervalIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// `first × factor^n`, clamped to `max`.
fn backoff_step(first: Duration, factor: f64, max: Duration, n: usize) -> Duration {
    let exp = i32::try_from(n).unwrap_or(i32::MAX);
    let secs = first.as_secs_f64() * factor.powi(exp);
    if !secs.is_finite() || secs < 0.0 || secs > max.as_secs_f64() {
        max
    } else {
        Duration::from_secs_f64(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn natural_len_covers_all_shapes() {
        assert_eq!(IntervalSchedule::new([ms(1), ms(2)]).natural_len(), Some(2));
        assert_eq!(
            IntervalSchedule::new([ms(1), ms(2)]).with_step_limit(1).natural_len(),
            Some(1)
        );
        assert_eq!(
            IntervalSchedule::new([ms(1)]).with_step_limit(9).natural_len(),
            Some(1)
        );
        assert_eq!(
            IntervalSchedule::regular(ms(5)).with_step_limit(3).natural_len(),
            Some(3)
        );
        assert_eq!(IntervalSchedule::regular(ms(5)).natural_len(), None);
        assert!(IntervalSchedule::regular(ms(5)).is_infinite());
    }

    #[test]
    fn from_secs_accepts_fractions() {
        let s = IntervalSchedule::from_secs(&[0.1, 0.2, 0.4]).unwrap();
        assert_eq!(s.first_steps(), &[ms(100), ms(200), ms(400)]);
    }

    #[test]
    fn from_secs_rejects_negative_and_nan() {
        assert_eq!(
            IntervalSchedule::from_secs(&[0.1, -1.0]),
            Err(ScheduleError::InvalidStep { value: -1.0 })
        );
        assert!(matches!(
            IntervalSchedule::from_secs(&[f64::NAN]),
            Err(ScheduleError::InvalidStep { .. })
        ));
    }

    #[test]
    fn validate_flags_zero_quantum_and_bad_truncation() {
        let zero = IntervalSchedule::new([ms(1)]).with_randomized(Duration::ZERO);
        assert_eq!(zero.validate(), Err(ScheduleError::ZeroQuantum));

        let negative = IntervalSchedule::new([ms(1)])
            .with_randomized(ms(10))
            .with_truncated(-0.5);
        assert_eq!(
            negative.validate(),
            Err(ScheduleError::InvalidTruncation { value: -0.5 })
        );

        assert!(IntervalSchedule::default().validate().is_ok());
    }

    #[test]
    fn exponential_growth_is_clamped() {
        let s = IntervalSchedule::exponential(ms(100), 2.0, Duration::from_secs(1), 6);
        assert_eq!(
            s.first_steps(),
            &[ms(100), ms(200), ms(400), ms(800), ms(1000), ms(1000)]
        );
    }

    #[test]
    fn exponential_constant_factor() {
        let s = IntervalSchedule::exponential(ms(500), 1.0, Duration::from_secs(30), 10);
        assert!(s.first_steps().iter().all(|d| *d == ms(500)));
    }

    #[test]
    fn exponential_first_exceeding_max_clamps() {
        let s = IntervalSchedule::exponential(
            Duration::from_secs(10),
            2.0,
            Duration::from_secs(5),
            1,
        );
        assert_eq!(s.first_steps(), &[Duration::from_secs(5)]);
    }

    #[test]
    fn exponential_overflow_clamps_to_max() {
        assert_eq!(
            backoff_step(ms(100), 2.0, Duration::from_secs(10), usize::MAX),
            Duration::from_secs(10)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip_keeps_fields() {
        let s = IntervalSchedule::new([ms(100)])
            .with_regular_steps(Duration::from_secs(1))
            .with_step_limit(3)
            .with_randomized(ms(50))
            .with_truncated(0.5);
        let json = serde_json::to_string(&s).unwrap();
        let back: IntervalSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);

        let partial: IntervalSchedule = serde_json::from_str(r#"{"step_limit": 2}"#).unwrap();
        assert_eq!(partial.step_limit(), Some(2));
        assert!(partial.first_steps().is_empty());
    }
}
