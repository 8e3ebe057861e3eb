//! # LogWriter: events as `tracing` records.
//!
//! Emits one record per event, using [`Event::describe`] as the message.
//! Faults, timeouts, panics and overflow go out at `WARN`; everything else at `INFO`.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! INFO retryvisor: Starting attempt 1 retry="fetch" seq=0
//! INFO retryvisor: Attempt 1 completed (maybe) retry="fetch" seq=1
//! INFO retryvisor: Pausing for 0.5 seconds retry="fetch" seq=2
//! WARN retryvisor: Terminated (faulted: no hold time specified) retry="fetch" seq=9
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber forwarding every event to `tracing`.
#[derive(Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_warning(e: &Event) -> bool {
    match e.kind {
        EventKind::TimeoutHit
        | EventKind::AttemptPanicked
        | EventKind::SubscriberOverflow
        | EventKind::SubscriberPanicked => true,
        EventKind::Terminated => e
            .reason
            .as_deref()
            .is_some_and(|r| r.starts_with("faulted")),
        _ => false,
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let line = e.describe();
        let retry = e.retry.as_deref().unwrap_or("-");
        if is_warning(e) {
            tracing::warn!(target: "retryvisor", retry, seq = e.seq, "{line}");
        } else {
            tracing::info!(target: "retryvisor", retry, seq = e.seq, "{line}");
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_and_overflow_are_warnings() {
        let faulted = Event::new(EventKind::Terminated).with_reason("faulted: no hold time specified");
        let aborted = Event::new(EventKind::Terminated).with_reason("aborted");
        assert!(is_warning(&faulted));
        assert!(!is_warning(&aborted));
        assert!(is_warning(&Event::subscriber_overflow("x", "full")));
        assert!(!is_warning(&Event::new(EventKind::HoldScheduled)));
    }
}
