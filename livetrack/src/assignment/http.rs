//! HTTP assignment resolver backed by the order service.
//!
//! Queries `GET {base_url}/orders/{order_id}/assignment`, which answers
//!
//! ```json
//! {"status": "out_for_delivery",
//!  "driver": {"id": 9, "name": "Ravi", "mobile_no": "9829012345"}}
//! ```
//!
//! with `driver: null` for orders not yet dispatched, and 404 for unknown
//! orders. Any other failure is reported as retryable.

use std::time::Duration;

use reqwest::StatusCode;

use super::error::AssignmentError;
use super::types::{Assignment, OrderId};
use super::AssignmentResolver;

/// Default HTTP timeout for order service requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolver that asks the order service over HTTP.
///
/// Reuses one `reqwest::Client` for connection pooling.
#[derive(Debug, Clone)]
pub struct HttpAssignmentResolver {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAssignmentResolver {
    /// Create a resolver for the order service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("livetrack/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL queried for an order.
    pub fn assignment_url(&self, order_id: &OrderId) -> String {
        format!("{}/orders/{}/assignment", self.base_url, order_id)
    }
}

impl AssignmentResolver for HttpAssignmentResolver {
    async fn resolve(&self, order_id: &OrderId) -> Result<Assignment, AssignmentError> {
        let url = self.assignment_url(order_id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AssignmentError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AssignmentError::NotFound(order_id.clone()));
        }
        if !status.is_success() {
            return Err(AssignmentError::Unavailable(format!(
                "order service returned {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssignmentError::Unavailable(e.to_string()))?;

        let assignment: Assignment = serde_json::from_slice(&bytes).map_err(|e| {
            AssignmentError::Unavailable(format!("malformed order service response: {e}"))
        })?;

        tracing::trace!(
            order_id = %order_id,
            status = %assignment.status,
            has_driver = assignment.driver.is_some(),
            "Order assignment resolved"
        );

        Ok(assignment)
    }
}
