//! Tracking error taxonomy.
//!
//! Absence of data (no driver assigned, no fresh position) is never an
//! error; it is a successful [`TrackingResult`](super::TrackingResult) with
//! empty fields.

use thiserror::Error;

use crate::assignment::{AssignmentError, InvalidOrderId, OrderId};
use crate::position::PositionError;

/// Errors surfaced by the ingest and lookup paths.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingError {
    /// Malformed input; nothing was written.
    #[error("{0}")]
    BadRequest(String),

    /// The order does not exist.
    #[error("Order not found")]
    NotFound(OrderId),

    /// The order service failed or timed out; retry later.
    #[error("Tracking temporarily unavailable: {0}")]
    Unavailable(String),
}

impl TrackingError {
    /// Whether the caller may succeed by retrying the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<PositionError> for TrackingError {
    fn from(e: PositionError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<InvalidOrderId> for TrackingError {
    fn from(e: InvalidOrderId) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<AssignmentError> for TrackingError {
    fn from(e: AssignmentError) -> Self {
        match e {
            AssignmentError::NotFound(order_id) => Self::NotFound(order_id),
            AssignmentError::Unavailable(reason) => Self::Unavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_errors_keep_their_kind() {
        let order = OrderId::from(42);
        assert_eq!(
            TrackingError::from(AssignmentError::NotFound(order.clone())),
            TrackingError::NotFound(order)
        );

        let unavailable = TrackingError::from(AssignmentError::Unavailable("down".into()));
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn test_invalid_coordinate_is_bad_request() {
        let err = TrackingError::from(PositionError::InvalidCoordinate {
            latitude: 91.0,
            longitude: 0.0,
        });
        assert!(matches!(err, TrackingError::BadRequest(_)));
        assert!(!err.is_retryable());
    }
}
