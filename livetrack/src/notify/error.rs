use thiserror::Error;

/// Errors delivering a lifecycle event.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The HTTP client could not be built.
    #[error("Failed to build notification client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request did not reach the receiver or timed out.
    #[error("Notification delivery failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The receiver answered with a non-success status.
    #[error("Notification rejected with HTTP {status}")]
    Rejected { status: u16 },
}
