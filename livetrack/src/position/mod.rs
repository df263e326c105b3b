//! Live driver positions.
//!
//! The [`PositionStore`] is the single owner of driver positions. Ingest
//! writes into it, lookups read from it, and the [`ExpirySweeper`] keeps its
//! memory bounded.
//!
//! # Architecture
//!
//! ```text
//! driver ping ──► upsert ──┐
//!                          ▼
//!                  ┌───────────────┐   subscribe   ┌──────────────────┐
//!                  │ PositionStore │──────────────►│ PositionEvent rx │
//!                  │  (DashMap)    │               └──────────────────┘
//!                  └───────────────┘
//!                     ▲        ▲
//!   order lookup ─ get┘        └─ evict_expired ◄── ExpirySweeper
//! ```
//!
//! # Usage
//!
//! ```
//! use livetrack::position::{DriverId, PositionStore};
//!
//! let store = PositionStore::default();
//! let driver = DriverId::parse("D1").unwrap();
//!
//! store.upsert(driver.clone(), 26.91, 75.78, store.now()).unwrap();
//! assert!(store.get(&driver).is_some());
//! ```

mod error;
mod events;
mod geo;
mod state;
mod store;
mod sweeper;

pub use error::PositionError;
pub use events::PositionEvent;
pub use geo::{distance_km, EARTH_RADIUS_KM};
pub use state::{Coordinate, DriverId, DriverPosition, LATITUDE_RANGE, LONGITUDE_RANGE};
pub use store::{
    NearbyDriver, PositionStore, PositionStoreConfig, UpsertOutcome, DEFAULT_EVENT_CAPACITY,
    DEFAULT_EVICT_GRACE, DEFAULT_STALE_AFTER,
};
pub use sweeper::{ExpirySweeper, DEFAULT_SWEEP_INTERVAL};
