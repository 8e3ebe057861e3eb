//! # Example: hold_and_resume
//!
//! An upload that keeps getting interrupted. Each interruption carries the
//! bytes sent so far; after the hold the coordinator resumes from there.
//! Transient failures while resuming are rested on the same schedule.
//!
//! ## Flow
//! ```text
//! Attempting ─Interrupted(256)─► Holding(1s) ─Tick─► Resuming(256)
//!   ─Maybe─► Resting(0.2s) ─Tick─► Resuming(256)
//!   ─Interrupted(768)─► Holding(1s) ─Tick─► Resuming(768)
//!   ─Succeeded(1024)─► Terminated
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example hold_and_resume --features logging
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use retryvisor::{
    AttemptFn, IntervalSchedule, LogWriter, Outcome, Retrier, RetryConfig, Subscribe,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const TOTAL: u64 = 1024;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = RetryConfig {
        schedule: IntervalSchedule::new([Duration::from_millis(200), Duration::from_millis(400)]),
        hold: Some(Duration::from_secs(1)),
        timeout: Duration::from_secs(5),
        ..RetryConfig::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let retrier = Retrier::new(cfg, subs)?;

    let tries = Arc::new(AtomicU32::new(0));
    let upload = AttemptFn::arc("upload", move |ctx: CancellationToken, sent: Option<u64>| {
        let tries = Arc::clone(&tries);
        async move {
            let n = tries.fetch_add(1, Ordering::Relaxed) + 1;
            let sent = sent.unwrap_or(0);
            println!("[upload] try {n}, resuming at byte {sent}");

            tokio::time::sleep(Duration::from_millis(50)).await;
            if ctx.is_cancelled() {
                return Outcome::Interrupted(sent);
            }
            match n {
                1 => Outcome::Interrupted(256),
                2 => Outcome::Maybe,
                3 => Outcome::Interrupted(768),
                _ => Outcome::Succeeded(TOTAL),
            }
        }
    });

    let done = retrier.run_until_signal(upload).await;
    retrier.shutdown().await;

    println!("[upload] finished: {}", done?.as_message());
    Ok(())
}
