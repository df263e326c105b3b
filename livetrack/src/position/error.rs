//! Error types for the position store.

use thiserror::Error;

/// Errors raised when validating or storing a driver position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    /// Latitude or longitude outside the valid range, or not finite.
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Driver identifier was empty or contained only whitespace.
    #[error("driver id must not be empty")]
    EmptyDriverId,
}
