//! # Runtime events emitted by the retry coordinator and its driver.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Attempt events**: one attempt's lifecycle (starting, completed, timeout, panic)
//! - **Wait events**: the coordinator scheduled a tick (pause, hold, rest, glare)
//! - **Stop/terminal events**: caller stop, forwarded stop, final termination
//! - **Runtime events**: OS shutdown, subscriber overflow/panic
//!
//! The [`Event`] struct carries metadata such as timestamps, retry name,
//! attempt number, delay and reason. [`Event::describe`] renders the
//! human-readable trace line (`"Pausing for 0.1 seconds"`).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::PauseScheduled)
//!     .with_retry("fetch")
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(100));
//!
//! assert_eq!(ev.kind, EventKind::PauseScheduled);
//! assert_eq!(ev.retry.as_deref(), Some("fetch"));
//! assert_eq!(ev.describe(), "Pausing for 0.1 seconds");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Attempt events ===
    /// The coordinator invoked the attempt factory.
    ///
    /// Sets:
    /// - `attempt`: attempt number (1-based, per coordinator)
    /// - `resumed`: `true` when the attempt received partial work
    AttemptStarting,

    /// An attempt delivered its result.
    ///
    /// Sets:
    /// - `attempt`: attempt number
    /// - `reason`: outcome label (`maybe`, `cannot`, `interrupted`, `succeeded`)
    AttemptCompleted,

    /// An attempt exceeded its per-attempt timeout; it reports `Maybe`.
    ///
    /// Sets:
    /// - `attempt`: attempt number
    /// - `delay`: the configured timeout
    TimeoutHit,

    /// An attempt panicked; it reports `Cannot`.
    ///
    /// Sets:
    /// - `attempt`: attempt number
    /// - `reason`: panic message
    AttemptPanicked,

    // === Wait events ===
    /// Pause between two ordinary attempts of a burst.
    ///
    /// Sets: `attempt` (previous attempt), `delay`
    PauseScheduled,

    /// Hold between an interrupted attempt and its resumption.
    ///
    /// Sets: `attempt` (previous attempt), `delay`
    HoldScheduled,

    /// Rest between two resumption attempts.
    ///
    /// Sets: `attempt` (previous attempt), `delay`
    RestScheduled,

    /// Glare between an exhausted burst and the next burst.
    ///
    /// Sets: `attempt` (previous attempt), `delay`
    GlareScheduled,

    // === Stop / terminal events ===
    /// The caller requested a stop.
    StopRequested,

    /// Stop was forwarded to the in-flight attempt; draining.
    ///
    /// Sets: `attempt` (the in-flight attempt)
    StopForwarded,

    /// The coordinator delivered its termination.
    ///
    /// Sets:
    /// - `attempt`: attempts started so far
    /// - `reason`: termination label (`succeeded`, `cannot`, `exhausted`, `aborted`, `faulted`)
    ///   or `label: detail` for `cannot` / `faulted`
    Terminated,

    // === Runtime events ===
    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `retry` (subscriber name), `reason`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `retry` (subscriber name), `reason` (panic message)
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the retry run (or subscriber for subscriber events).
    pub retry: Option<Arc<str>>,
    /// Attempt number (starting from 1).
    pub attempt: Option<u32>,
    /// Scheduled delay or timeout.
    pub delay: Option<Duration>,
    /// Human-readable reason (labels, errors, overflow details).
    pub reason: Option<Arc<str>>,
    /// Whether the attempt resumes partial work.
    pub resumed: bool,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            retry: None,
            attempt: None,
            delay: None,
            reason: None,
            resumed: false,
        }
    }

    /// Attaches the retry name.
    #[inline]
    pub fn with_retry(mut self, name: impl Into<Arc<str>>) -> Self {
        self.retry = Some(name.into());
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Marks the attempt as a resumption.
    #[inline]
    pub fn with_resumed(mut self, resumed: bool) -> Self {
        self.resumed = resumed;
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_retry(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_retry(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// Returns `true` for the four wait kinds (pause, hold, rest, glare).
    #[inline]
    pub fn is_wait(&self) -> bool {
        matches!(
            self.kind,
            EventKind::PauseScheduled
                | EventKind::HoldScheduled
                | EventKind::RestScheduled
                | EventKind::GlareScheduled
        )
    }

    /// Renders the human-readable trace line for this event.
    pub fn describe(&self) -> String {
        let secs = self.delay.unwrap_or_default().as_secs_f64();
        let attempt = self.attempt.unwrap_or_default();
        let reason = self.reason.as_deref().unwrap_or("unknown");
        match self.kind {
            EventKind::AttemptStarting if self.resumed => format!("Resuming attempt {attempt}"),
            EventKind::AttemptStarting => format!("Starting attempt {attempt}"),
            EventKind::AttemptCompleted => format!("Attempt {attempt} completed ({reason})"),
            EventKind::TimeoutHit => format!("Attempt {attempt} timed out after {secs} seconds"),
            EventKind::AttemptPanicked => format!("Attempt {attempt} panicked: {reason}"),
            EventKind::PauseScheduled => format!("Pausing for {secs} seconds"),
            EventKind::HoldScheduled => format!("Holding for {secs} seconds"),
            EventKind::RestScheduled => format!("Resting for {secs} seconds"),
            EventKind::GlareScheduled => format!("Glaring for {secs} seconds"),
            EventKind::StopRequested => "Stop requested".to_string(),
            EventKind::StopForwarded => format!("Stopping attempt {attempt}"),
            EventKind::Terminated => format!("Terminated ({reason})"),
            EventKind::ShutdownRequested => "Shutdown requested".to_string(),
            EventKind::SubscriberOverflow => format!("Subscriber overflow: {reason}"),
            EventKind::SubscriberPanicked => format!("Subscriber panicked: {reason}"),
        }
    }
}
