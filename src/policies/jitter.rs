//! # Quantized jitter for interval steps.
//!
//! [`Jitter`] spreads retries from many coordinators so they do not fire in
//! lock-step. Unlike proportional jitter, the randomness is added in whole
//! multiples of a fixed quantum:
//!
//! ```text
//! bound = floor(base × truncated / quantum) + 1
//! k     = uniform integer in [0, bound)
//! delay = base + k × quantum
//! ```
//!
//! - `truncated` absent → factor `1.0` (jitter may add up to the base itself)
//! - `base == 0`        → bound is 1, so `k == 0` and no jitter is added
//! - delays never shrink below `base`

use std::time::Duration;

use rand::Rng;

/// Jitter added in whole multiples of a quantum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jitter {
    quantum: Duration,
    truncated: f64,
}

impl Jitter {
    /// Creates a jitter with the given quantum and optional truncation factor.
    ///
    /// Returns `None` for a zero quantum, which means "no jitter".
    /// A negative or non-finite truncation factor is treated as `0.0`.
    pub fn new(quantum: Duration, truncated: Option<f64>) -> Option<Self> {
        if quantum.is_zero() {
            return None;
        }
        let truncated = match truncated {
            None => 1.0,
            Some(t) if t.is_finite() && t >= 0.0 => t,
            Some(_) => 0.0,
        };
        Some(Self { quantum, truncated })
    }

    /// Returns the randomization quantum.
    pub fn quantum(&self) -> Duration {
        self.quantum
    }

    /// Number of distinct multipliers available for `base` (always ≥ 1).
    ///
    /// Computed in whole nanoseconds; saturates at `u64::MAX`.
    pub fn bound(&self, base: Duration) -> u64 {
        let scaled = (base.as_nanos() as f64 * self.truncated).floor();
        if !scaled.is_finite() || scaled < 1.0 {
            return 1;
        }
        // floor(floor(x) / q) == floor(x / q) for integer q.
        let steps = scaled as u128 / self.quantum.as_nanos();
        u64::try_from(steps).unwrap_or(u64::MAX).saturating_add(1)
    }

    /// Applies jitter to `base` using `rng`.
    pub fn apply<R: Rng>(&self, base: Duration, rng: &mut R) -> Duration {
        let bound = self.bound(base);
        if bound == 1 {
            return base;
        }
        let k = rng.random_range(0..bound);
        let quantum_ns = u64::try_from(self.quantum.as_nanos()).unwrap_or(u64::MAX);
        let extra = k
            .checked_mul(quantum_ns)
            .map_or(Duration::MAX, Duration::from_nanos);
        base.saturating_add(extra)
    }
}
