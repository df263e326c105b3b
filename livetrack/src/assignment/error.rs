//! Error types for assignment resolution.

use thiserror::Error;

use super::types::OrderId;

/// Errors returned by an [`AssignmentResolver`](super::AssignmentResolver).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignmentError {
    /// The order does not exist.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The order service could not be reached or answered unusably.
    ///
    /// Retryable; callers should back off rather than treat it as final.
    #[error("assignment service unavailable: {0}")]
    Unavailable(String),
}

/// An order identifier failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order id '{0}': expected 1-64 characters of [A-Za-z0-9_-]")]
pub struct InvalidOrderId(pub String);
