//! Runtime wiring for the tracking service.
//!
//! The CLI owns one [`LiveTrackRuntime`], which owns the shared
//! [`PositionStore`](crate::position::PositionStore) and the background
//! daemons around it. The HTTP server runs alongside and shares the same
//! shutdown token.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    LiveTrackRuntime                      │
//! │                                                          │
//! │   HTTP handlers ──► Arc<PositionStore> ◄── ExpirySweeper │
//! │                          │                               │
//! │                          │ broadcast<PositionEvent>      │
//! │                          ▼                               │
//! │                NotificationForwarder ──► WebhookSink     │
//! │                                                          │
//! │   CancellationToken ── fans out to every task above      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Daemons are peers: each is started with a clone of the shutdown token
//! and stopped by cancelling it.

mod orchestrator;

pub use orchestrator::{LiveTrackRuntime, RuntimeConfig, DEFAULT_NOTIFY_TIMEOUT};
