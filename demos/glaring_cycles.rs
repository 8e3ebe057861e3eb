//! # Example: glaring_cycles
//!
//! A dependency that stays down for a while. Each burst of quick, jittered
//! retries is followed by a longer glare before the burst starts over. The
//! glare schedule is finite, so the run ends `Exhausted` if the dependency
//! never comes back; here it recovers during the third burst.
//!
//! Events are printed by a small custom subscriber.
//!
//! ## Run
//! ```bash
//! cargo run --example glaring_cycles
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use retryvisor::{
    AttemptFn, Event, IntervalSchedule, Outcome, Retrier, RetryConfig, Subscribe, Termination,
};
use tokio_util::sync::CancellationToken;

struct Printer;

#[async_trait]
impl Subscribe for Printer {
    async fn on_event(&self, ev: &Event) {
        println!("[{:>3}] {}", ev.seq, ev.describe());
    }

    fn name(&self) -> &'static str {
        "printer"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let burst = IntervalSchedule::exponential(
        Duration::from_millis(50),
        2.0,
        Duration::from_millis(200),
        3,
    )
    .with_randomized(Duration::from_millis(10))
    .with_truncated(0.5);
    let glare = IntervalSchedule::regular(Duration::from_millis(500)).with_step_limit(3);

    let cfg = RetryConfig {
        schedule: burst,
        repeat: Some(glare),
        ..RetryConfig::default()
    };
    let retrier = Retrier::builder(cfg)
        .with_subscriber(Arc::new(Printer))
        .build()?;

    let calls = Arc::new(AtomicU32::new(0));
    let probe = AttemptFn::arc("probe", move |_ctx: CancellationToken, _work: Option<()>| {
        let calls = Arc::clone(&calls);
        async move {
            let n = calls.fetch_add(1, Ordering::Relaxed) + 1;
            if n < 10 {
                Outcome::<u32, ()>::Maybe
            } else {
                Outcome::Succeeded(n)
            }
        }
    });

    match retrier.run(probe, CancellationToken::new()).await {
        Termination::Succeeded(n) => println!("recovered after {n} calls"),
        other => println!("gave up: {}", other.as_message()),
    }

    retrier.shutdown().await;
    Ok(())
}
