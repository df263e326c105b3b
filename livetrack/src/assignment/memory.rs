//! In-memory assignment resolver.
//!
//! Backed by a `DashMap`; used by tests and the `--demo` server mode in
//! place of the real order service.

use dashmap::DashMap;

use super::error::AssignmentError;
use super::types::{Assignment, DriverContact, OrderId};
use super::AssignmentResolver;

/// Concurrent map of order → assignment.
#[derive(Debug, Default)]
pub struct InMemoryAssignments {
    orders: DashMap<OrderId, Assignment>,
}

impl InMemoryAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an order's assignment.
    pub fn insert(&self, order_id: OrderId, assignment: Assignment) {
        self.orders.insert(order_id, assignment);
    }

    /// Assign (or reassign) a driver to an existing order.
    ///
    /// Returns false if the order is unknown.
    pub fn assign_driver(&self, order_id: &OrderId, driver: DriverContact) -> bool {
        match self.orders.get_mut(order_id) {
            Some(mut assignment) => {
                assignment.driver = Some(driver);
                true
            }
            None => false,
        }
    }

    /// Update an existing order's status. Returns false if unknown.
    pub fn set_status(&self, order_id: &OrderId, status: impl Into<String>) -> bool {
        match self.orders.get_mut(order_id) {
            Some(mut assignment) => {
                assignment.status = status.into();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl AssignmentResolver for InMemoryAssignments {
    async fn resolve(&self, order_id: &OrderId) -> Result<Assignment, AssignmentError> {
        self.orders
            .get(order_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AssignmentError::NotFound(order_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::DriverId;

    fn contact(id: &str) -> DriverContact {
        DriverContact {
            driver_id: DriverId::parse(id).unwrap(),
            name: "Ravi".to_string(),
            mobile_no: "9829012345".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_order() {
        let assignments = InMemoryAssignments::new();
        let order = OrderId::from(1);

        assert_eq!(
            assignments.resolve(&order).await,
            Err(AssignmentError::NotFound(order))
        );
    }

    #[tokio::test]
    async fn test_assign_driver_and_status() {
        let assignments = InMemoryAssignments::new();
        let order = OrderId::from(42);
        assignments.insert(order.clone(), Assignment::unassigned("cooking"));

        assert!(assignments.resolve(&order).await.unwrap().driver.is_none());

        assert!(assignments.assign_driver(&order, contact("D9")));
        assert!(assignments.set_status(&order, "out_for_delivery"));

        let resolved = assignments.resolve(&order).await.unwrap();
        assert_eq!(resolved.status, "out_for_delivery");
        assert_eq!(resolved.driver, Some(contact("D9")));
    }

    #[test]
    fn test_updates_to_unknown_order_are_rejected() {
        let assignments = InMemoryAssignments::new();
        let order = OrderId::from(7);

        assert!(!assignments.assign_driver(&order, contact("D1")));
        assert!(!assignments.set_status(&order, "delivered"));
        assert!(assignments.is_empty());
    }
}
