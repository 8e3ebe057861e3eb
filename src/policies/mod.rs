//! Interval policies.
//!
//! This module groups the knobs that control **how long** the coordinator
//! waits between attempts, between resumptions and between bursts.
//!
//! ## Contents
//! - [`IntervalSchedule`] immutable description (first steps / regular step / limit + jitter)
//! - [`IntervalIterator`] lazy, single-pass sequence of delays for a schedule
//! - [`Jitter`]           quantized randomization applied to each base delay
//!
//! ## Quick wiring
//! ```text
//! RetryCoordinator { schedule, repeat_schedule }
//!      └─► schedule.iter()        fresh per burst (start, glare, resume)
//!      └─► repeat_schedule.iter() created lazily on the first glare, never reset
//! ```

mod intervals;
mod jitter;
mod schedule;

pub use intervals::IntervalIterator;
pub use jitter::Jitter;
pub use schedule::IntervalSchedule;
