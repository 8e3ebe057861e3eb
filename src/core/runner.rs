//! # Run a single attempt.
//!
//! Executes one try of an [`Attempt`] with an optional timeout and panic
//! capture, publishing diagnostics to the [`Bus`].
//!
//! ```text
//! Normal:
//!   attempt.spawn() → Outcome                       (returned as-is)
//!
//! Timeout:
//!   timeout exceeded → cancel ctx → publish TimeoutHit → Outcome::Maybe
//!
//! Panic:
//!   attempt panics → publish AttemptPanicked → Outcome::Cannot("attempt panicked: ...")
//! ```
//!
//! ## Rules
//! - Always yields **exactly one** outcome, so the coordinator always gets its `Completed`.
//! - A timed-out try is transient: the coordinator moves on to its next interval.
//! - A panicking try is permanent: retrying the same code path is not expected to help.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    attempts::Attempt,
    coordinator::Outcome,
    error::panic_message,
    events::{Bus, Event, EventKind},
};

/// Executes one try of `attempt`, resuming `work` if given.
///
/// ### Timeout behavior
/// If `timeout` is `Some(dur)` and `dur > 0`, the try is wrapped in
/// `tokio::time::timeout`. On expiry `ctx` is cancelled, `TimeoutHit` is
/// published and the outcome is [`Outcome::Maybe`].
pub(crate) async fn run_once<A: Attempt>(
    attempt: Arc<A>,
    ctx: CancellationToken,
    work: Option<A::Work>,
    timeout: Option<Duration>,
    number: u32,
    name: Arc<str>,
    bus: Bus,
) -> Outcome<A::Value, A::Work> {
    let child = ctx.clone();
    let guarded = AssertUnwindSafe(async move { attempt.spawn(child, work).await }).catch_unwind();

    let res = match timeout.filter(|d| !d.is_zero()) {
        Some(dur) => match time::timeout(dur, guarded).await {
            Ok(r) => r,
            Err(_elapsed) => {
                ctx.cancel();
                publish_timeout(&bus, &name, dur, number);
                return Outcome::Maybe;
            }
        },
        None => guarded.await,
    };

    match res {
        Ok(outcome) => outcome,
        Err(payload) => {
            let info = panic_message(payload.as_ref());
            publish_panicked(&bus, &name, number, &info);
            Outcome::Cannot(format!("attempt panicked: {info}"))
        }
    }
}

fn publish_timeout(bus: &Bus, name: &Arc<str>, dur: Duration, number: u32) {
    bus.publish(
        Event::new(EventKind::TimeoutHit)
            .with_retry(Arc::clone(name))
            .with_attempt(number)
            .with_delay(dur),
    );
}

fn publish_panicked(bus: &Bus, name: &Arc<str>, number: u32, info: &str) {
    bus.publish(
        Event::new(EventKind::AttemptPanicked)
            .with_retry(Arc::clone(name))
            .with_attempt(number)
            .with_reason(info),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempts::AttemptFn;

    fn name() -> Arc<str> {
        Arc::from("probe")
    }

    #[tokio::test(start_paused = true)]
    async fn passes_outcome_through() {
        let attempt = AttemptFn::arc("probe", |_ctx: CancellationToken, work: Option<u8>| async move {
            Outcome::<u8, u8>::Succeeded(work.unwrap_or(0) + 1)
        });
        let out = run_once(attempt, CancellationToken::new(), Some(4), None, 1, name(), Bus::new(8)).await;
        assert_eq!(out, Outcome::Succeeded(5));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reports_maybe_and_cancels() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let ctx = CancellationToken::new();
        let attempt = AttemptFn::arc("probe", |ctx: CancellationToken, _work: Option<()>| async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = ctx;
            Outcome::<(), ()>::Succeeded(())
        });

        let out = run_once(
            attempt,
            ctx.clone(),
            None,
            Some(Duration::from_secs(1)),
            3,
            name(),
            bus,
        )
        .await;

        assert_eq!(out, Outcome::Maybe);
        assert!(ctx.is_cancelled());
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::TimeoutHit);
        assert_eq!(ev.attempt, Some(3));
        assert_eq!(ev.delay, Some(Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn panic_reports_cannot() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let attempt = AttemptFn::arc("probe", |_ctx: CancellationToken, _work: Option<()>| async move {
            if true {
                panic!("kaboom");
            }
            Outcome::<(), ()>::Maybe
        });

        let out = run_once(attempt, CancellationToken::new(), None, None, 1, name(), bus).await;

        assert_eq!(out, Outcome::Cannot("attempt panicked: kaboom".to_string()));
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::AttemptPanicked);
        assert_eq!(ev.reason.as_deref(), Some("kaboom"));
    }
}
