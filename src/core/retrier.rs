//! # Retrier: front-end that owns the bus, subscribers and configuration.
//!
//! The [`Retrier`] validates a [`RetryConfig`], fans bus events out to a
//! [`SubscriberSet`], and runs attempts through [`RetryActor`]s.
//!
//! ## Architecture
//! ```text
//! Retrier::new(cfg, subscribers)
//!   ├─► cfg.validate()
//!   └─► listener: Bus.subscribe() ─► SubscriberSet::emit(&Event)   (fire-and-forget)
//!
//! Retrier::run(attempt, stop)
//!   └─► RetryActor::new(bus, attempt, cfg.params()).run(stop) ─► Termination
//!
//! Retrier::run_until_signal(attempt)
//!   ├─► run finishes first            → Ok(termination)
//!   └─► SIGINT / SIGTERM / SIGQUIT
//!         ├─► Bus.publish(ShutdownRequested)
//!         ├─► stop.cancel()            → coordinator gets Stop
//!         └─► wait up to cfg.grace:
//!               ├─ drained              → Ok(termination)
//!               └─ still running        → Err(GraceExceeded)
//!
//! Retrier::shutdown()
//!   └─► listener forwards the bus backlog, then SubscriberSet::shutdown() drains every queue
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{AttemptFn, IntervalSchedule, Outcome, Retrier, RetryConfig, Termination};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = RetryConfig {
//!         schedule: IntervalSchedule::new([Duration::from_millis(10)]),
//!         ..RetryConfig::default()
//!     };
//!     let retrier = Retrier::new(cfg, Vec::new())?;
//!
//!     let ping = AttemptFn::arc("ping", |_ctx: CancellationToken, _work: Option<()>| async move {
//!         Outcome::<&'static str, ()>::Succeeded("pong")
//!     });
//!
//!     let done = retrier.run(ping, CancellationToken::new()).await;
//!     assert_eq!(done, Termination::Succeeded("pong"));
//!     retrier.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::{select, sync::broadcast, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::{
    attempts::Attempt,
    config::RetryConfig,
    coordinator::Termination,
    core::{actor::RetryActor, shutdown},
    error::RuntimeError,
    events::{Bus, Event, EventKind},
    subscribers::{Subscribe, SubscriberSet},
};

/// Runs attempts with a shared configuration, bus and subscriber set.
pub struct Retrier {
    cfg: RetryConfig,
    bus: Bus,
    listener: CancellationToken,
    listener_task: Option<JoinHandle<()>>,
}

impl Retrier {
    /// Creates a retrier and starts forwarding bus events to `subscribers`.
    ///
    /// Must be called inside a tokio runtime. Fails with
    /// [`RuntimeError::InvalidSchedule`] if either schedule is invalid.
    pub fn new(
        cfg: RetryConfig,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Result<Self, RuntimeError> {
        cfg.validate()?;
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(subscribers, bus.clone());

        let mut retrier = Self {
            cfg,
            bus,
            listener: CancellationToken::new(),
            listener_task: None,
        };
        retrier.listener_task = Some(retrier.subscriber_listener(subs));
        Ok(retrier)
    }

    /// Starts a [`RetrierBuilder`].
    pub fn builder(cfg: RetryConfig) -> RetrierBuilder {
        RetrierBuilder::new(cfg)
    }

    pub fn config(&self) -> &RetryConfig {
        &self.cfg
    }

    /// Bus shared by every run of this retrier.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Builds the actor that [`run`](Self::run) would drive.
    pub fn actor<A: Attempt>(&self, attempt: Arc<A>) -> RetryActor<A> {
        RetryActor::new(self.bus.clone(), attempt, self.cfg.params())
    }

    /// Runs `attempt` until it terminates. Cancel `stop` to abort.
    pub async fn run<A: Attempt>(
        &self,
        attempt: Arc<A>,
        stop: CancellationToken,
    ) -> Termination<A::Value> {
        self.actor(attempt).run(stop).await
    }

    /// Runs `attempt` until it terminates or the process gets a termination signal.
    ///
    /// On a signal the run is stopped and given up to `cfg.grace` to drain
    /// its in-flight attempt.
    pub async fn run_until_signal<A: Attempt>(
        &self,
        attempt: Arc<A>,
    ) -> Result<Termination<A::Value>, RuntimeError> {
        let stop = CancellationToken::new();
        let run = self.run(attempt, stop.clone());
        tokio::pin!(run);

        let signal = select! {
            done = &mut run => return Ok(done),
            signal = shutdown::wait_for_shutdown_signal() => signal.map_err(RuntimeError::Signal)?,
        };

        self.bus
            .publish(Event::new(EventKind::ShutdownRequested).with_reason(signal));
        stop.cancel();

        time::timeout(self.cfg.grace, run)
            .await
            .map_err(|_| RuntimeError::GraceExceeded {
                grace: self.cfg.grace,
            })
    }

    /// Forwards the remaining event backlog to subscribers and waits for
    /// them to process it.
    ///
    /// Call this after the last run so trailing events such as `Terminated`
    /// reach every subscriber. Dropping the retrier starts the same drain
    /// in the background without waiting for it.
    pub async fn shutdown(mut self) {
        self.listener.cancel();
        if let Some(task) = self.listener_task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "event listener failed");
            }
        }
    }

    /// Forwards bus events to `set` until cancelled, then drains both.
    fn subscriber_listener(&self, set: SubscriberSet) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let done = self.listener.clone();
        tokio::spawn(async move {
            loop {
                // Backlog first: cancellation only wins on an empty queue.
                let ev = select! {
                    biased;
                    ev = rx.recv() => ev,
                    _ = done.cancelled() => break,
                };
                match ev {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        })
    }
}

impl Drop for Retrier {
    fn drop(&mut self) {
        self.listener.cancel();
    }
}

/// Builder for a [`Retrier`].
pub struct RetrierBuilder {
    cfg: RetryConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RetrierBuilder {
    pub fn new(cfg: RetryConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one event subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Validates the configuration and builds the retrier.
    pub fn build(self) -> Result<Retrier, RuntimeError> {
        Retrier::new(self.cfg, self.subscribers)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::{attempts::AttemptFn, coordinator::Outcome, error::ScheduleError, policies::IntervalSchedule};

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    #[async_trait]
    impl Subscribe for Lines {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().unwrap().push(ev.describe());
        }
        fn name(&self) -> &'static str {
            "lines"
        }
    }

    #[tokio::test]
    async fn rejects_invalid_schedule() {
        let cfg = RetryConfig {
            schedule: IntervalSchedule::new([Duration::from_secs(1)]).with_truncated(-1.0),
            ..RetryConfig::default()
        };
        let err = Retrier::new(cfg, Vec::new()).err().unwrap();
        assert_eq!(err.as_label(), "runtime_invalid_schedule");
        assert!(matches!(
            err,
            RuntimeError::InvalidSchedule(ScheduleError::InvalidTruncation { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_the_trace() {
        let lines = Arc::new(Lines::default());
        let cfg = RetryConfig {
            schedule: IntervalSchedule::new([Duration::from_millis(100)]),
            ..RetryConfig::default()
        };
        let retrier = Retrier::builder(cfg)
            .with_subscriber(lines.clone())
            .build()
            .unwrap();

        let tries = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&tries);
        let attempt = AttemptFn::arc("fetch", move |_ctx: CancellationToken, _work: Option<()>| {
            let counter = Arc::clone(&counter);
            async move {
                let mut n = counter.lock().unwrap();
                *n += 1;
                if *n == 1 {
                    Outcome::<(), ()>::Maybe
                } else {
                    Outcome::Succeeded(())
                }
            }
        });

        let done = retrier.run(attempt, CancellationToken::new()).await;
        assert_eq!(done, Termination::Succeeded(()));

        retrier.shutdown().await;
        let seen = lines.0.lock().unwrap().clone();
        assert!(seen.contains(&"Pausing for 0.1 seconds".to_string()));
        assert_eq!(seen.last().map(String::as_str), Some("Terminated (succeeded)"));
    }

    /// Yields once per event, so it lags behind a fast run.
    #[derive(Default)]
    struct SlowLines(Mutex<Vec<String>>);

    #[async_trait]
    impl Subscribe for SlowLines {
        async fn on_event(&self, ev: &Event) {
            tokio::task::yield_now().await;
            self.0.lock().unwrap().push(ev.describe());
        }
        fn name(&self) -> &'static str {
            "slow-lines"
        }
    }

    #[tokio::test]
    async fn shutdown_delivers_trailing_events() {
        let lines = Arc::new(SlowLines::default());
        let retrier = Retrier::new(RetryConfig::default(), vec![lines.clone() as Arc<dyn Subscribe>]).unwrap();

        let attempt = AttemptFn::arc("once", |_ctx: CancellationToken, _work: Option<()>| async move {
            Outcome::<u8, ()>::Succeeded(1)
        });
        assert_eq!(
            retrier.run(attempt, CancellationToken::new()).await,
            Termination::Succeeded(1)
        );
        retrier.shutdown().await;

        let seen = lines.0.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "Starting attempt 1".to_string(),
                "Attempt 1 completed (succeeded)".to_string(),
                "Terminated (succeeded)".to_string(),
            ]
        );
    }
}
