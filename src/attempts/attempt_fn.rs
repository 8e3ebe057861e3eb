//! # Function-backed attempt (`AttemptFn`)
//!
//! [`AttemptFn`] wraps a closure `F: Fn(CancellationToken, Option<W>) -> Fut`,
//! producing a fresh future per try. There is no hidden mutation between
//! tries; shared state must be an explicit `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{Attempt, AttemptFn, Outcome};
//!
//! let ping = AttemptFn::arc("ping", |_ctx: CancellationToken, _work: Option<()>| async move {
//!     Outcome::<&'static str, ()>::Succeeded("pong")
//! });
//!
//! assert_eq!(ping.name(), "ping");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::attempts::attempt::{Attempt, BoxAttemptFuture};
use crate::coordinator::Outcome;

/// Function-backed attempt implementation.
pub struct AttemptFn<F, V, W> {
    name: Cow<'static, str>,
    f: F,
    _types: PhantomData<fn() -> (V, W)>,
}

impl<F, V, W> AttemptFn<F, V, W> {
    /// Creates a new function-backed attempt.
    ///
    /// Prefer [`AttemptFn::arc`] when the attempt goes straight to a runner.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _types: PhantomData,
        }
    }

    /// Creates the attempt wrapped in an `Arc`.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, V, W> fmt::Debug for AttemptFn<F, V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptFn").field("name", &self.name).finish()
    }
}

impl<F, Fut, V, W> Attempt for AttemptFn<F, V, W>
where
    F: Fn(CancellationToken, Option<W>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Outcome<V, W>> + Send + 'static,
    V: Send + 'static,
    W: Clone + Send + 'static,
{
    type Value = V;
    type Work = W;

    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self, ctx: CancellationToken, work: Option<W>) -> BoxAttemptFuture<V, W> {
        Box::pin((self.f)(ctx, work))
    }
}
