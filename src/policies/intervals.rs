//! # Lazy delay sequence for an [`IntervalSchedule`].
//!
//! ```text
//! first_steps[0] … first_steps[n-1] ─► regular_steps, regular_steps, …
//!        └──────────── capped by step_limit ───────────┘
//!                              │
//!                              ▼
//!                  jitter (if randomized is set)
//! ```
//!
//! The iterator is single-pass; the coordinator creates a fresh one from the
//! schedule whenever a burst restarts.

use std::iter::FusedIterator;
use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};

use crate::policies::jitter::Jitter;
use crate::policies::schedule::IntervalSchedule;

/// Stateful iterator over the delays of a schedule.
#[derive(Clone, Debug)]
pub struct IntervalIterator {
    first_steps: Vec<Duration>,
    regular_steps: Option<Duration>,
    step_limit: Option<usize>,
    jitter: Option<Jitter>,
    rng: StdRng,
    /// Next index into `first_steps`; past the end means the regular phase.
    index: usize,
    emitted: usize,
}

impl IntervalIterator {
    /// Creates an iterator seeded from the thread-local RNG.
    pub fn new(schedule: &IntervalSchedule) -> Self {
        Self::with_rng(schedule, StdRng::from_rng(&mut rand::rng()))
    }

    /// Creates an iterator with a deterministic seed (for replay and tests).
    pub fn seeded(schedule: &IntervalSchedule, seed: u64) -> Self {
        Self::with_rng(schedule, StdRng::seed_from_u64(seed))
    }

    fn with_rng(schedule: &IntervalSchedule, rng: StdRng) -> Self {
        Self {
            first_steps: schedule.first_steps().to_vec(),
            regular_steps: schedule.regular_steps(),
            step_limit: schedule.step_limit(),
            jitter: schedule
                .randomized()
                .and_then(|q| Jitter::new(q, schedule.truncated())),
            rng,
            index: 0,
            emitted: 0,
        }
    }

    /// Number of delays emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn next_base(&mut self) -> Option<Duration> {
        if self.step_limit.is_some_and(|limit| self.emitted >= limit) {
            return None;
        }
        if let Some(step) = self.first_steps.get(self.index) {
            self.index += 1;
            return Some(*step);
        }
        self.regular_steps
    }
}

impl Iterator for IntervalIterator {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let base = self.next_base()?;
        self.emitted += 1;
        Some(match &self.jitter {
            Some(jitter) => jitter.apply(base, &mut self.rng),
            None => base,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let first_left = self.first_steps.len().saturating_sub(self.index);
        let natural = match self.regular_steps {
            Some(_) => None,
            None => Some(first_left),
        };
        let capped = match (natural, self.step_limit) {
            (n, Some(limit)) => {
                let left = limit.saturating_sub(self.emitted);
                Some(n.map_or(left, |n| n.min(left)))
            }
            (n, None) => n,
        };
        (capped.unwrap_or(usize::MAX), capped)
    }
}

impl FusedIterator for IntervalIterator {}
