//! Driver lifecycle notifications.
//!
//! The [`PositionStore`](crate::position::PositionStore) publishes
//! [`PositionEvent`]s; a [`NotificationForwarder`] subscribes and hands
//! each one to a [`NotificationSink`]. Delivery failures are logged and
//! never reach the ingest path.

mod error;
mod forwarder;
mod webhook;

use std::future::Future;

pub use error::NotifyError;
pub use forwarder::{ForwarderStats, NotificationForwarder};
pub use webhook::WebhookSink;

use crate::position::PositionEvent;

/// Receives driver lifecycle events.
pub trait NotificationSink: Send + Sync + 'static {
    /// Deliver one event.
    fn deliver(&self, event: &PositionEvent)
        -> impl Future<Output = Result<(), NotifyError>> + Send;
}
