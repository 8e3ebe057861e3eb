//! # Event subscribers.
//!
//! [`Subscribe`] is the trait for custom handlers; [`SubscriberSet`] fans
//! events out to them. With the `logging` feature, [`LogWriter`] forwards
//! events to `tracing`.
//!
//! ```text
//! RetryCoordinator ── publish(Event) ──► Bus ──► Retrier listener ──► SubscriberSet::emit
//!                                                                  ┌──────────┼──────────┐
//!                                                                  ▼          ▼          ▼
//!                                                              LogWriter   Metrics    Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
