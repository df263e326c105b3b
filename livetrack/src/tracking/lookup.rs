//! Lookup - the customer "where is my order" read path.
//!
//! Resolves the order through the [`AssignmentResolver`] (the only step
//! allowed to wait on I/O, and bounded by a timeout), then reads the
//! assigned driver's fresh position from the [`PositionStore`].
//!
//! Three outcomes are normal and kept distinct:
//!
//! | State              | `driver` | `position` |
//! |--------------------|----------|------------|
//! | Awaiting driver    | `None`   | `None`     |
//! | Awaiting position  | `Some`   | `None`     |
//! | Live               | `Some`   | `Some`     |

use std::sync::Arc;
use std::time::Duration;

use super::error::TrackingError;
use crate::assignment::{AssignmentError, AssignmentResolver, DriverContact, OrderId};
use crate::position::{DriverPosition, PositionStore};

/// Default bound on the assignment lookup.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for the lookup service.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Maximum time to wait for the assignment resolver.
    pub resolve_timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }
}

/// Which of the normal tracking states a result is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// Order not dispatched yet.
    AwaitingDriver,
    /// Driver assigned but no fresh position reported.
    AwaitingPosition,
    /// Driver assigned with a fresh position.
    Live,
}

/// Tracking view of an order, assembled per request and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingResult {
    pub order_id: OrderId,
    pub status: String,
    pub driver: Option<DriverContact>,
    pub position: Option<DriverPosition>,
}

impl TrackingResult {
    pub fn state(&self) -> TrackingState {
        match (&self.driver, &self.position) {
            (None, _) => TrackingState::AwaitingDriver,
            (Some(_), None) => TrackingState::AwaitingPosition,
            (Some(_), Some(_)) => TrackingState::Live,
        }
    }
}

/// Read path assembling [`TrackingResult`]s.
pub struct LookupService<R> {
    resolver: R,
    store: Arc<PositionStore>,
    config: LookupConfig,
}

impl<R: AssignmentResolver> LookupService<R> {
    pub fn new(resolver: R, store: Arc<PositionStore>, config: LookupConfig) -> Self {
        Self {
            resolver,
            store,
            config,
        }
    }

    /// Parse an order id from a request and track it.
    pub async fn track_raw(&self, order_id: &str) -> Result<TrackingResult, TrackingError> {
        let order_id = OrderId::parse(order_id)?;
        self.track(&order_id).await
    }

    /// Assemble the tracking view of an order.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::NotFound`] if the order does not exist
    /// - [`TrackingError::Unavailable`] if the resolver failed or timed out
    pub async fn track(&self, order_id: &OrderId) -> Result<TrackingResult, TrackingError> {
        let resolved =
            tokio::time::timeout(self.config.resolve_timeout, self.resolver.resolve(order_id))
                .await;

        let assignment = match resolved {
            Ok(Ok(assignment)) => assignment,
            Ok(Err(AssignmentError::NotFound(id))) => return Err(TrackingError::NotFound(id)),
            Ok(Err(e)) => {
                tracing::warn!(order_id = %order_id, error = %e, "Assignment lookup failed");
                return Err(e.into());
            }
            Err(_) => {
                let timeout_ms = self.config.resolve_timeout.as_millis() as u64;
                tracing::warn!(order_id = %order_id, timeout_ms, "Assignment lookup timed out");
                return Err(TrackingError::Unavailable(format!(
                    "order lookup timed out after {timeout_ms}ms"
                )));
            }
        };

        let position = assignment
            .driver
            .as_ref()
            .and_then(|driver| self.store.get(&driver.driver_id));

        Ok(TrackingResult {
            order_id: order_id.clone(),
            status: assignment.status,
            driver: assignment.driver,
            position,
        })
    }
}
