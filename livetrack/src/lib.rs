//! LiveTrack - live driver location tracking for delivery orders.
//!
//! Drivers report their position every few seconds; customers poll the
//! position of the driver assigned to their order. Positions are held in
//! memory only, last write wins, and anything older than the staleness
//! threshold is treated as unknown.
//!
//! # Modules
//!
//! - [`position`] - the concurrent position store, its events and sweeper
//! - [`assignment`] - order → driver lookup against the order service
//! - [`tracking`] - ingest (write) and lookup (read) services
//! - [`server`] - the axum HTTP surface
//! - [`notify`] - forwarding driver lifecycle events to a webhook
//! - [`runtime`] - owns the store and background daemons
//! - [`config`] - INI configuration
//! - [`logging`] - tracing setup
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use livetrack::assignment::{Assignment, DriverContact, InMemoryAssignments, OrderId};
//! use livetrack::position::{DriverId, PositionStore};
//! use livetrack::tracking::{LookupConfig, LookupService, TrackingState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(PositionStore::default());
//! let orders = InMemoryAssignments::new();
//! orders.insert(
//!     OrderId::from(42),
//!     Assignment::assigned(
//!         "out_for_delivery",
//!         DriverContact {
//!             driver_id: DriverId::parse("D9").unwrap(),
//!             name: "Ravi".into(),
//!             mobile_no: "9829012345".into(),
//!         },
//!     ),
//! );
//!
//! store.upsert(DriverId::parse("D9").unwrap(), 26.91, 75.78, store.now()).unwrap();
//!
//! let lookup = LookupService::new(orders, Arc::clone(&store), LookupConfig::default());
//! let result = lookup.track(&OrderId::from(42)).await.unwrap();
//! assert_eq!(result.state(), TrackingState::Live);
//! # }
//! ```

pub mod assignment;
pub mod config;
pub mod logging;
pub mod notify;
pub mod position;
pub mod runtime;
pub mod server;
pub mod time;
pub mod tracking;

/// Version of the LiveTrack library and CLI.
///
/// Shared by all workspace members and reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
