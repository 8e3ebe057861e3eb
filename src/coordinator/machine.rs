//! # RetryCoordinator: the attempt → wait → attempt state machine.
//!
//! The coordinator is a pure function of `(state, input) → (next state, effects)`.
//! It never blocks, sleeps or spawns. Effects go through two seams:
//! - [`AttemptFactory`] starts an attempt and later stops it;
//! - [`Timer`] requests (or cancels) a single delayed `Tick`.
//!
//! Whoever owns the coordinator delivers inputs in the order they occur and
//! routes `Completed`/`Tick` back from the factory and the timer.
//!
//! ## Event flow
//! ```text
//! Start ─► factory.start(None) ─► Completed(Maybe) ─► timer.schedule(pause) ─► Tick ─► …
//!                                 Completed(Interrupted(w)) ─► timer.schedule(hold) ─► Tick
//!                                     ─► factory.start(Some(w)) (fresh burst)
//!                                 Completed(Succeeded(v)) ─► Termination::Succeeded(v)
//! ```
//!
//! ## Rules
//! - At most **one** attempt is in flight and at most **one** tick is pending.
//! - `deliver` returns `Some(Termination)` **exactly once**; afterwards every
//!   input is ignored and returns `None`.
//! - Inputs that a state does not expect are dropped.
//! - Stop while waiting terminates immediately with `Aborted`; stop while an
//!   attempt is in flight is forwarded and the attempt is drained first.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::coordinator::outcome::{Input, Outcome, Termination};
use crate::coordinator::state::State;
use crate::error::Fault;
use crate::events::{Bus, Event, EventKind};
use crate::policies::{IntervalIterator, IntervalSchedule};

/// Starts attempts on behalf of the coordinator.
///
/// `start` must return promptly and arrange for exactly one
/// `Input::Completed` to be delivered back to the coordinator, even after
/// `stop` was called for that attempt.
pub trait AttemptFactory<W> {
    /// Opaque identifier of a started attempt, used only to route `stop`.
    type Handle;

    /// Starts a new attempt, fresh (`None`) or resuming partial work.
    fn start(&mut self, work: Option<W>) -> Self::Handle;

    /// Asks the attempt identified by `handle` to finish early.
    fn stop(&mut self, handle: &Self::Handle);
}

/// Delivers a single `Input::Tick` after a delay.
pub trait Timer {
    /// Requests a tick after at least `delay`.
    fn schedule(&mut self, delay: Duration);

    /// Drops the pending tick, if any.
    fn cancel(&mut self);
}

/// Coordinator of bounded, jittered attempts with hold/resume and repeat cycles.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::{AttemptFactory, Input, IntervalSchedule, Outcome, RetryCoordinator, Termination, Timer};
///
/// #[derive(Default)]
/// struct Starts(u32);
/// impl AttemptFactory<()> for Starts {
///     type Handle = u32;
///     fn start(&mut self, _work: Option<()>) -> u32 { self.0 += 1; self.0 }
///     fn stop(&mut self, _handle: &u32) {}
/// }
///
/// #[derive(Default)]
/// struct Ticks(Vec<Duration>);
/// impl Timer for Ticks {
///     fn schedule(&mut self, delay: Duration) { self.0.push(delay) }
///     fn cancel(&mut self) {}
/// }
///
/// let schedule = IntervalSchedule::new([Duration::from_millis(100)]);
/// let mut c: RetryCoordinator<&str, (), _, _> =
///     RetryCoordinator::new(Starts::default(), Ticks::default(), schedule);
///
/// assert_eq!(c.deliver(Input::Start), None);
/// assert_eq!(c.deliver(Input::Completed(Outcome::Maybe)), None);
/// assert_eq!(c.timer().0, vec![Duration::from_millis(100)]);
/// assert_eq!(c.deliver(Input::Tick), None);
/// assert_eq!(
///     c.deliver(Input::Completed(Outcome::Succeeded("ok"))),
///     Some(Termination::Succeeded("ok"))
/// );
/// assert_eq!(c.factory().0, 2);
/// ```
pub struct RetryCoordinator<V, W, A, T>
where
    A: AttemptFactory<W>,
    T: Timer,
{
    factory: A,
    timer: T,
    schedule: IntervalSchedule,
    repeat: Option<IntervalSchedule>,
    hold: Option<Duration>,

    state: State,
    current: Option<A::Handle>,
    attempt_iter: Option<IntervalIterator>,
    repeat_iter: Option<IntervalIterator>,
    work: Option<W>,
    tick_pending: bool,
    attempts: u32,

    name: Option<Arc<str>>,
    bus: Option<Bus>,
    _value: PhantomData<fn() -> V>,
}

impl<V, W, A, T> RetryCoordinator<V, W, A, T>
where
    W: Clone,
    A: AttemptFactory<W>,
    T: Timer,
{
    /// Creates a coordinator in [`State::Initial`].
    pub fn new(factory: A, timer: T, schedule: IntervalSchedule) -> Self {
        Self {
            factory,
            timer,
            schedule,
            repeat: None,
            hold: None,
            state: State::Initial,
            current: None,
            attempt_iter: None,
            repeat_iter: None,
            work: None,
            tick_pending: false,
            attempts: 0,
            name: None,
            bus: None,
            _value: PhantomData,
        }
    }

    /// Sets the wait before resuming an interrupted attempt.
    #[must_use]
    pub fn with_hold(mut self, hold: impl Into<Option<Duration>>) -> Self {
        self.hold = hold.into();
        self
    }

    /// Sets the schedule of glares between exhausted bursts.
    #[must_use]
    pub fn with_repeat(mut self, repeat: impl Into<Option<IntervalSchedule>>) -> Self {
        self.repeat = repeat.into();
        self
    }

    /// Publishes transition events to `bus`.
    #[must_use]
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Names this coordinator in published events.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns `true` once a termination has been returned.
    pub fn is_terminated(&self) -> bool {
        self.state == State::Terminated
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Partial work stored by the last `Interrupted`.
    pub fn work(&self) -> Option<&W> {
        self.work.as_ref()
    }

    /// The attempt factory this coordinator drives.
    pub fn factory(&self) -> &A {
        &self.factory
    }

    /// The timer this coordinator schedules ticks on.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Delivers one input and returns the termination, if this input caused it.
    pub fn deliver(&mut self, input: Input<V, W>) -> Option<Termination<V>> {
        let done = match (self.state, input) {
            (State::Initial, Input::Start) => {
                self.attempt_iter = Some(self.schedule.iter());
                self.launch(None, State::Attempting);
                None
            }

            (State::Attempting, Input::Completed(outcome)) => {
                self.on_completed(outcome, State::Pausing)
            }
            (State::Resuming, Input::Completed(outcome)) => {
                self.on_completed(outcome, State::Resting)
            }
            (State::Attempting | State::Resuming, Input::Stop) => {
                self.forward_stop();
                None
            }

            (State::Pausing, Input::Tick) => {
                self.tick_pending = false;
                self.launch(None, State::Attempting);
                None
            }
            (State::Holding, Input::Tick) => {
                self.tick_pending = false;
                let work = self.work.clone();
                self.launch(work, State::Resuming);
                self.attempt_iter = Some(self.schedule.iter());
                None
            }
            (State::Resting, Input::Tick) => {
                self.tick_pending = false;
                let work = self.work.clone();
                self.launch(work, State::Resuming);
                None
            }
            (State::Glaring, Input::Tick) => {
                self.tick_pending = false;
                self.launch(None, State::Attempting);
                self.attempt_iter = Some(self.schedule.iter());
                None
            }
            (State::Pausing | State::Holding | State::Resting | State::Glaring, Input::Stop) => {
                self.publish(Event::new(EventKind::StopRequested));
                Some(Termination::Aborted)
            }

            (State::Clearing, Input::Completed(_)) => {
                self.current = None;
                Some(Termination::Aborted)
            }

            // Unexpected in this state (including anything after termination).
            _ => None,
        };
        done.map(|t| self.finish(t))
    }

    fn on_completed(&mut self, outcome: Outcome<V, W>, rest: State) -> Option<Termination<V>> {
        self.current = None;
        self.publish(
            Event::new(EventKind::AttemptCompleted)
                .with_attempt(self.attempts)
                .with_reason(outcome.as_label()),
        );

        match outcome {
            Outcome::Succeeded(value) => Some(Termination::Succeeded(value)),
            Outcome::Cannot(reason) => Some(Termination::Cannot(reason)),
            Outcome::Interrupted(work) => {
                let Some(hold) = self.hold else {
                    return Some(Termination::Faulted(Fault::NoHold));
                };
                self.work = Some(work);
                self.wait(hold, State::Holding, EventKind::HoldScheduled);
                None
            }
            Outcome::Maybe => self.after_transient_failure(rest),
        }
    }

    /// Next delay of the burst; on exhaustion, the next glare; otherwise `Exhausted`.
    fn after_transient_failure(&mut self, rest: State) -> Option<Termination<V>> {
        if let Some(delay) = self.attempt_iter.as_mut().and_then(Iterator::next) {
            let kind = match rest {
                State::Resting => EventKind::RestScheduled,
                _ => EventKind::PauseScheduled,
            };
            self.wait(delay, rest, kind);
            return None;
        }

        let Some(repeat) = &self.repeat else {
            return Some(Termination::Exhausted);
        };
        let glare = self
            .repeat_iter
            .get_or_insert_with(|| repeat.iter())
            .next();

        match glare {
            Some(delay) => {
                self.wait(delay, State::Glaring, EventKind::GlareScheduled);
                None
            }
            None => Some(Termination::Exhausted),
        }
    }

    fn launch(&mut self, work: Option<W>, next: State) {
        debug_assert!(self.current.is_none(), "attempt already in flight");
        self.attempts += 1;
        self.publish(
            Event::new(EventKind::AttemptStarting)
                .with_attempt(self.attempts)
                .with_resumed(work.is_some()),
        );
        self.current = Some(self.factory.start(work));
        self.state = next;
    }

    fn wait(&mut self, delay: Duration, next: State, kind: EventKind) {
        debug_assert!(!self.tick_pending, "tick already pending");
        self.timer.schedule(delay);
        self.tick_pending = true;
        self.state = next;
        self.publish(
            Event::new(kind)
                .with_attempt(self.attempts)
                .with_delay(delay),
        );
    }

    fn forward_stop(&mut self) {
        self.publish(Event::new(EventKind::StopRequested));
        if let Some(handle) = &self.current {
            self.factory.stop(handle);
        }
        self.publish(Event::new(EventKind::StopForwarded).with_attempt(self.attempts));
        self.state = State::Clearing;
    }

    /// Releases handles, iterators and the pending tick.
    fn finish(&mut self, termination: Termination<V>) -> Termination<V> {
        if self.tick_pending {
            self.timer.cancel();
            self.tick_pending = false;
        }
        self.current = None;
        self.attempt_iter = None;
        self.repeat_iter = None;
        self.work = None;
        self.state = State::Terminated;
        self.publish(
            Event::new(EventKind::Terminated)
                .with_attempt(self.attempts)
                .with_reason(termination.as_message()),
        );
        termination
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            let ev = match &self.name {
                Some(name) => ev.with_retry(Arc::clone(name)),
                None => ev,
            };
            bus.publish(ev);
        }
    }
}
