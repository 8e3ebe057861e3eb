//! # Attempt abstraction.
//!
//! An [`Attempt`] produces a fresh, `'static` future per try. The future
//! receives a [`CancellationToken`] (cancelled when the coordinator forwards
//! `Stop`, or when the per-attempt timeout expires) and the partial work left
//! by the last interrupted try, if resuming.

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::coordinator::Outcome;

/// Boxed future returned by [`Attempt::spawn`].
pub type BoxAttemptFuture<V, W> = Pin<Box<dyn Future<Output = Outcome<V, W>> + Send + 'static>>;

/// # Asynchronous, cancelable unit of work that can be retried and resumed.
///
/// Implementations should check `ctx` and finish promptly once it is
/// cancelled; whatever they report after a stop is ignored.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use retryvisor::{Attempt, BoxAttemptFuture, Outcome};
///
/// struct Download;
///
/// impl Attempt for Download {
///     type Value = usize;
///     type Work = usize;
///
///     fn name(&self) -> &str { "download" }
///
///     fn spawn(&self, ctx: CancellationToken, work: Option<usize>) -> BoxAttemptFuture<usize, usize> {
///         Box::pin(async move {
///             let offset = work.unwrap_or(0);
///             if ctx.is_cancelled() {
///                 return Outcome::Interrupted(offset);
///             }
///             Outcome::Succeeded(offset + 1024)
///         })
///     }
/// }
/// ```
pub trait Attempt: Send + Sync + 'static {
    /// Value reported on success.
    type Value: Send + 'static;
    /// Partial work carried from an interrupted try into its resumption.
    type Work: Clone + Send + 'static;

    /// Returns a stable, human-readable name.
    fn name(&self) -> &str;

    /// Creates the future for one try.
    fn spawn(
        &self,
        ctx: CancellationToken,
        work: Option<Self::Work>,
    ) -> BoxAttemptFuture<Self::Value, Self::Work>;
}
