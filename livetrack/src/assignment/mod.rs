//! Order → driver assignment lookup.
//!
//! Assignments belong to the order-management system; the tracking core only
//! reads them through the [`AssignmentResolver`] trait. Two implementations
//! are provided:
//!
//! - [`HttpAssignmentResolver`] - asks the order service over HTTP
//! - [`InMemoryAssignments`] - concurrent map, for tests and demos

mod error;
mod http;
mod memory;
mod types;

use std::future::Future;
use std::sync::Arc;

pub use error::{AssignmentError, InvalidOrderId};
pub use http::{HttpAssignmentResolver, DEFAULT_HTTP_TIMEOUT};
pub use memory::InMemoryAssignments;
pub use types::{Assignment, DriverContact, OrderId};

/// Resolves an order to its status and assigned driver.
///
/// Implementations may perform I/O; callers apply their own timeout.
pub trait AssignmentResolver: Send + Sync {
    /// Look up an order.
    ///
    /// # Errors
    ///
    /// - [`AssignmentError::NotFound`] if the order does not exist
    /// - [`AssignmentError::Unavailable`] if the lookup itself failed
    fn resolve(
        &self,
        order_id: &OrderId,
    ) -> impl Future<Output = Result<Assignment, AssignmentError>> + Send;
}

// Allow a shared resolver to be handed to the lookup service
impl<R: AssignmentResolver> AssignmentResolver for Arc<R> {
    async fn resolve(&self, order_id: &OrderId) -> Result<Assignment, AssignmentError> {
        (**self).resolve(order_id).await
    }
}
