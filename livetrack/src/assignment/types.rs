//! Order assignment data as seen by the tracking core.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::InvalidOrderId;
use crate::position::DriverId;

/// Maximum accepted order id length.
const MAX_ORDER_ID_LEN: usize = 64;

/// Identifier of a customer order.
///
/// Restricted to URL-safe characters so it can be embedded in request
/// paths to the order service without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Validate an order id.
    pub fn parse(raw: &str) -> Result<Self, InvalidOrderId> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= MAX_ORDER_ID_LEN
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidOrderId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Driver assigned to an order, with the contact details shown to customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverContact {
    #[serde(alias = "id")]
    pub driver_id: DriverId,
    pub name: String,
    pub mobile_no: String,
}

/// Resolution of an order: its status and, once dispatched, its driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub status: String,
    pub driver: Option<DriverContact>,
}

impl Assignment {
    /// An order that has no driver yet.
    pub fn unassigned(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            driver: None,
        }
    }

    /// An order with an assigned driver.
    pub fn assigned(status: impl Into<String>, driver: DriverContact) -> Self {
        Self {
            status: status.into(),
            driver: Some(driver),
        }
    }
}
