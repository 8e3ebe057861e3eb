//! # RetryActor: tokio driver for one retry run.
//!
//! Wires a [`RetryCoordinator`] to the tokio runtime:
//! - [`SpawnFactory`] starts each try as a tokio task running [`run_once`],
//! - [`SleepTimer`] schedules ticks with `tokio::time::sleep`,
//! - both feed their results back as [`Input`]s over one channel.
//!
//! ## Architecture
//! ```text
//! RetryActor::run()
//!
//!   deliver(Start)
//!   loop {
//!     select! {
//!       stop.cancelled() ──► deliver(Stop)            (once)
//!       rx.recv()        ──► deliver(Completed | Tick)
//!     }
//!     Some(termination) ──► return
//!   }
//!
//!   SpawnFactory.start() ──► tokio::spawn(run_once) ──► tx.send(Completed(outcome))
//!   SleepTimer.schedule() ──► tokio::spawn(sleep)   ──► tx.send(Tick)
//! ```
//!
//! ## Rules
//! - Inputs are delivered **one at a time** in arrival order; the first one dequeued wins.
//! - At most one try and one pending tick exist at any time.
//! - Dropping the actor future cancels the in-flight try and the pending tick.

use std::{sync::Arc, time::Duration};

use tokio::{
    select,
    sync::mpsc::{self, UnboundedSender},
    task::AbortHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    attempts::Attempt,
    coordinator::{AttemptFactory, Input, RetryCoordinator, Termination, Timer},
    core::runner::run_once,
    error::Fault,
    events::Bus,
    policies::IntervalSchedule,
};

/// Parameters for one retry run.
///
/// Extracted from a [`RetryConfig`](crate::RetryConfig) by the
/// [`Retrier`](crate::Retrier), or built directly.
#[derive(Clone, Debug)]
pub struct RetryParams {
    /// Burst intervals between transient failures.
    pub schedule: IntervalSchedule,
    /// Glare intervals between exhausted bursts (`None` = no glaring).
    pub repeat: Option<IntervalSchedule>,
    /// Hold time after an interruption (`None` = interruptions fault).
    pub hold: Option<Duration>,
    /// Optional per-try timeout (`None` = no timeout).
    pub timeout: Option<Duration>,
}

impl RetryParams {
    /// Parameters with only a burst schedule.
    pub fn new(schedule: IntervalSchedule) -> Self {
        Self {
            schedule,
            repeat: None,
            hold: None,
            timeout: None,
        }
    }
}

/// Drives one [`Attempt`] through a [`RetryCoordinator`] until it terminates.
pub struct RetryActor<A: Attempt> {
    /// Attempt to run.
    pub attempt: Arc<A>,
    /// Retry parameters.
    pub params: RetryParams,
    /// Internal event bus.
    pub bus: Bus,
}

impl<A: Attempt> RetryActor<A> {
    /// Creates a new actor.
    pub fn new(bus: Bus, attempt: Arc<A>, params: RetryParams) -> Self {
        Self {
            attempt,
            params,
            bus,
        }
    }

    /// Runs until the coordinator reports a [`Termination`].
    ///
    /// Cancelling `stop` delivers `Stop` to the coordinator exactly once; if a
    /// try is in flight, the run ends when that try reports back.
    pub async fn run(self, stop: CancellationToken) -> Termination<A::Value> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Input<A::Value, A::Work>>();
        let name: Arc<str> = Arc::from(self.attempt.name());

        let factory = SpawnFactory {
            attempt: self.attempt,
            tx: tx.clone(),
            timeout: self.params.timeout,
            name: Arc::clone(&name),
            bus: self.bus.clone(),
            started: 0,
            in_flight: None,
        };
        let timer = SleepTimer { tx, pending: None };

        let mut coordinator = RetryCoordinator::new(factory, timer, self.params.schedule)
            .with_hold(self.params.hold)
            .with_repeat(self.params.repeat)
            .with_bus(self.bus)
            .with_name(name);

        if let Some(done) = coordinator.deliver(Input::Start) {
            return done;
        }

        let mut stop_sent = false;
        loop {
            let input = select! {
                _ = stop.cancelled(), if !stop_sent => {
                    stop_sent = true;
                    Input::Stop
                }
                next = rx.recv() => match next {
                    Some(input) => input,
                    None => return Termination::Faulted(Fault::Disconnected),
                },
            };
            if let Some(done) = coordinator.deliver(input) {
                return done;
            }
        }
    }
}

/// Identifies one spawned try.
#[derive(Debug)]
pub struct AttemptHandle {
    number: u32,
    token: CancellationToken,
}

/// Starts tries as tokio tasks; each reports back with `Input::Completed`.
struct SpawnFactory<A: Attempt> {
    attempt: Arc<A>,
    tx: UnboundedSender<Input<A::Value, A::Work>>,
    timeout: Option<Duration>,
    name: Arc<str>,
    bus: Bus,
    started: u32,
    in_flight: Option<CancellationToken>,
}

impl<A: Attempt> AttemptFactory<A::Work> for SpawnFactory<A> {
    type Handle = AttemptHandle;

    fn start(&mut self, work: Option<A::Work>) -> AttemptHandle {
        self.started = self.started.saturating_add(1);
        let token = CancellationToken::new();

        let run = run_once(
            Arc::clone(&self.attempt),
            token.clone(),
            work,
            self.timeout,
            self.started,
            Arc::clone(&self.name),
            self.bus.clone(),
        );
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = run.await;
            if tx.send(Input::Completed(outcome)).is_err() {
                tracing::debug!("attempt finished after its retry run ended");
            }
        });

        self.in_flight = Some(token.clone());
        AttemptHandle {
            number: self.started,
            token,
        }
    }

    fn stop(&mut self, handle: &AttemptHandle) {
        tracing::debug!(attempt = handle.number, "cancelling attempt");
        handle.token.cancel();
    }
}

impl<A: Attempt> Drop for SpawnFactory<A> {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

/// One-shot tick timer backed by a spawned `sleep`.
struct SleepTimer<V, W> {
    tx: UnboundedSender<Input<V, W>>,
    pending: Option<AbortHandle>,
}

impl<V: Send + 'static, W: Send + 'static> Timer for SleepTimer<V, W> {
    fn schedule(&mut self, delay: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(Input::Tick);
        });
        self.pending = Some(handle.abort_handle());
    }

    fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<V, W> Drop for SleepTimer<V, W> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;
    use crate::{attempts::AttemptFn, coordinator::Outcome, events::EventKind};

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[tokio::test(start_paused = true)]
    async fn retries_then_succeeds_after_scheduled_pauses() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let attempt = AttemptFn::arc("flaky", move |_ctx: CancellationToken, _work: Option<()>| {
            let seen = Arc::clone(&seen);
            async move {
                if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                    Outcome::<u32, ()>::Maybe
                } else {
                    Outcome::Succeeded(7)
                }
            }
        });

        let schedule = IntervalSchedule::new([secs(1), secs(2), secs(4)]);
        let actor = RetryActor::new(Bus::new(64), attempt, RetryParams::new(schedule));

        let began = Instant::now();
        let done = actor.run(CancellationToken::new()).await;

        assert_eq!(done, Termination::Succeeded(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(began.elapsed(), secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_when_schedule_runs_out() {
        let attempt = AttemptFn::arc("down", |_ctx: CancellationToken, _work: Option<()>| async move {
            Outcome::<(), ()>::Maybe
        });
        let schedule = IntervalSchedule::new([secs(1)]);
        let actor = RetryActor::new(Bus::new(64), attempt, RetryParams::new(schedule));

        assert_eq!(actor.run(CancellationToken::new()).await, Termination::Exhausted);
    }

    #[tokio::test(start_paused = true)]
    async fn resumes_interrupted_work_after_hold() {
        let attempt = AttemptFn::arc("upload", |_ctx: CancellationToken, work: Option<u32>| async move {
            match work {
                None => Outcome::<u32, u32>::Interrupted(512),
                Some(offset) => Outcome::Succeeded(offset + 512),
            }
        });
        let params = RetryParams {
            hold: Some(secs(5)),
            ..RetryParams::new(IntervalSchedule::new([secs(1)]))
        };
        let actor = RetryActor::new(Bus::new(64), attempt, params);

        let began = Instant::now();
        assert_eq!(actor.run(CancellationToken::new()).await, Termination::Succeeded(1024));
        assert_eq!(began.elapsed(), secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_drains_in_flight_attempt() {
        let attempt = AttemptFn::arc("slow", |ctx: CancellationToken, _work: Option<()>| async move {
            ctx.cancelled().await;
            Outcome::<(), ()>::Maybe
        });
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let actor = RetryActor::new(bus, attempt, RetryParams::new(IntervalSchedule::new([secs(1)])));

        let stop = CancellationToken::new();
        let trigger = stop.clone();
        tokio::spawn(async move {
            time::sleep(secs(2)).await;
            trigger.cancel();
        });

        assert_eq!(actor.run(stop).await, Termination::Aborted);

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert!(kinds.contains(&EventKind::StopForwarded));
        assert_eq!(kinds.last(), Some(&EventKind::Terminated));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_pausing_aborts_immediately() {
        let attempt = AttemptFn::arc("down", |_ctx: CancellationToken, _work: Option<()>| async move {
            Outcome::<(), ()>::Maybe
        });
        let actor = RetryActor::new(
            Bus::new(64),
            attempt,
            RetryParams::new(IntervalSchedule::new([secs(60)])),
        );

        let stop = CancellationToken::new();
        let trigger = stop.clone();
        tokio::spawn(async move {
            time::sleep(secs(1)).await;
            trigger.cancel();
        });

        let began = Instant::now();
        assert_eq!(actor.run(stop).await, Termination::Aborted);
        assert_eq!(began.elapsed(), secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_attempt_is_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let attempt = AttemptFn::arc("hang", move |_ctx: CancellationToken, _work: Option<()>| {
            let first = seen.fetch_add(1, Ordering::SeqCst) == 0;
            async move {
                if first {
                    time::sleep(secs(3600)).await;
                }
                Outcome::<&'static str, ()>::Succeeded("ok")
            }
        });
        let params = RetryParams {
            timeout: Some(secs(10)),
            ..RetryParams::new(IntervalSchedule::new([secs(1)]))
        };
        let actor = RetryActor::new(Bus::new(64), attempt, params);

        let began = Instant::now();
        assert_eq!(actor.run(CancellationToken::new()).await, Termination::Succeeded("ok"));
        assert_eq!(began.elapsed(), secs(11));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
