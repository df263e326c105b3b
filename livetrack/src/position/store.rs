//! PositionStore - in-memory index of live driver positions.
//!
//! Holds the latest accepted report per driver. Reports are applied
//! last-write-wins by timestamp, so a report delayed in the network never
//! rolls the visible position back.
//!
//! # Thread Safety
//!
//! Entries live in a `DashMap`: reads and writes lock only the shard that
//! owns the driver key, so one busy driver never blocks the rest of the
//! fleet. The timestamp comparison and replacement happen under the same
//! shard write lock, which makes the last-write-wins check atomic per driver.
//!
//! # Expiry
//!
//! - Reads treat entries older than `stale_after` as absent
//! - Entries older than `stale_after + evict_grace` are physically removed
//!   by [`PositionStore::evict_expired`], normally driven by the
//!   [`ExpirySweeper`](super::ExpirySweeper)
//!
//! # Durability
//!
//! None. Positions are ephemeral by nature; a restart simply waits for the
//! next round of driver pings.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;

use super::error::PositionError;
use super::events::PositionEvent;
use super::geo::distance_km;
use super::state::{Coordinate, DriverId, DriverPosition};
use crate::time::{to_time_delta, Clock, SystemClock};

/// Default age after which a position is treated as unknown.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(90);

/// Default extra time a stale entry is retained before eviction.
pub const DEFAULT_EVICT_GRACE: Duration = Duration::from_secs(3600);

/// Default capacity of the lifecycle event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Configuration for the position store.
#[derive(Debug, Clone)]
pub struct PositionStoreConfig {
    /// Age after which reads report a position as absent.
    pub stale_after: Duration,

    /// Additional retention after staleness before physical eviction.
    pub evict_grace: Duration,

    /// Capacity of the lifecycle event broadcast channel.
    pub event_capacity: usize,
}

impl Default for PositionStoreConfig {
    fn default() -> Self {
        Self {
            stale_after: DEFAULT_STALE_AFTER,
            evict_grace: DEFAULT_EVICT_GRACE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Result of an [`upsert`](PositionStore::upsert).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The report replaced (or created) the stored position.
    ///
    /// `came_online` is true when the driver had no fresh position before.
    Applied { came_online: bool },

    /// The report was older than the stored one and was dropped.
    Superseded { stored_at: DateTime<Utc> },
}

impl UpsertOutcome {
    /// Whether the report is now the visible position.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A fresh driver position together with its distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyDriver {
    pub position: DriverPosition,
    pub distance_km: f64,
}

/// Concurrent, in-memory store of the latest position per driver.
///
/// Shared across request handlers as `Arc<PositionStore>`; there is no
/// global instance.
pub struct PositionStore {
    entries: DashMap<DriverId, DriverPosition>,
    clock: Arc<dyn Clock>,
    stale_after: TimeDelta,
    evict_after: TimeDelta,
    events: broadcast::Sender<PositionEvent>,
}

impl PositionStore {
    /// Create a store using the system clock.
    pub fn new(config: PositionStoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a store with an explicit clock.
    pub fn with_clock(config: PositionStoreConfig, clock: Arc<dyn Clock>) -> Self {
        let stale_after = to_time_delta(config.stale_after);
        let evict_after = stale_after
            .checked_add(&to_time_delta(config.evict_grace))
            .unwrap_or(TimeDelta::MAX);
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            entries: DashMap::new(),
            clock,
            stale_after,
            evict_after,
            events,
        }
    }

    /// Current time according to the store's clock.
    ///
    /// Ingest stamps reports with this so staleness is judged on one clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Staleness threshold.
    pub fn stale_after(&self) -> TimeDelta {
        self.stale_after
    }

    /// Insert or replace the position of a driver.
    ///
    /// A report whose `recorded_at` is older than the stored one is dropped
    /// and reported as [`UpsertOutcome::Superseded`]. Equal or newer
    /// timestamps replace the entry, so retries are idempotent. A stored
    /// entry stamped ahead of the store clock never supersedes anything.
    ///
    /// # Errors
    ///
    /// [`PositionError::InvalidCoordinate`] if the coordinate is out of range
    /// or not finite. Nothing is written in that case.
    pub fn upsert(
        &self,
        driver_id: DriverId,
        latitude: f64,
        longitude: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, PositionError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let now = self.clock.now();
        let position = DriverPosition::new(driver_id.clone(), coordinate, recorded_at);

        // Events are sent under the entry lock so subscribers see map order
        match self.entries.entry(driver_id) {
            Entry::Occupied(mut entry) => {
                let current = entry.get();
                if recorded_at < current.recorded_at && !current.is_ahead_of(now) {
                    return Ok(UpsertOutcome::Superseded {
                        stored_at: current.recorded_at,
                    });
                }
                let came_online = current.is_stale(now, self.stale_after);
                if came_online {
                    self.announce_online(&position);
                }
                entry.insert(position);
                Ok(UpsertOutcome::Applied { came_online })
            }
            Entry::Vacant(entry) => {
                self.announce_online(&position);
                entry.insert(position);
                Ok(UpsertOutcome::Applied { came_online: true })
            }
        }
    }

    fn announce_online(&self, position: &DriverPosition) {
        tracing::debug!(driver_id = %position.driver_id, "Driver came online");
        let _ = self.events.send(PositionEvent::DriverOnline {
            position: position.clone(),
        });
    }

    /// Fresh position for a driver, or `None` if absent or stale.
    pub fn get(&self, driver_id: &DriverId) -> Option<DriverPosition> {
        let now = self.clock.now();
        self.entries
            .get(driver_id)
            .filter(|entry| !entry.is_stale(now, self.stale_after))
            .map(|entry| entry.value().clone())
    }

    /// Stored position regardless of freshness.
    ///
    /// For diagnostics only; tracking reads must go through [`get`](Self::get).
    pub fn peek(&self, driver_id: &DriverId) -> Option<DriverPosition> {
        self.entries
            .get(driver_id)
            .map(|entry| entry.value().clone())
    }

    /// Remove a driver's entry (explicit offline signal).
    ///
    /// Returns the removed position, or `None` if the driver was unknown.
    pub fn remove(&self, driver_id: &DriverId) -> Option<DriverPosition> {
        let (_, removed) = self.entries.remove_if(driver_id, |_, position| {
            let _ = self.events.send(PositionEvent::DriverOffline {
                driver_id: position.driver_id.clone(),
            });
            true
        })?;
        Some(removed)
    }

    /// Physically remove entries past the staleness threshold plus grace.
    ///
    /// Returns the number of evicted entries.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut evicted = 0;

        self.entries.retain(|_, position| {
            if position.age(now) <= self.evict_after {
                return true;
            }
            let _ = self.events.send(PositionEvent::DriverExpired {
                driver_id: position.driver_id.clone(),
                last_seen: position.recorded_at,
            });
            evicted += 1;
            false
        });

        evicted
    }

    /// Fresh drivers within `radius_km` of `center`, nearest first.
    ///
    /// Linear scan over the fleet; at most `limit` results.
    pub fn nearest(&self, center: Coordinate, radius_km: f64, limit: usize) -> Vec<NearbyDriver> {
        if limit == 0 || radius_km.is_nan() || radius_km < 0.0 {
            return Vec::new();
        }

        let now = self.clock.now();
        let mut found: Vec<NearbyDriver> = self
            .entries
            .iter()
            .filter(|entry| !entry.is_stale(now, self.stale_after))
            .filter_map(|entry| {
                let distance = distance_km(center, entry.coordinate());
                (distance <= radius_km).then(|| NearbyDriver {
                    position: entry.value().clone(),
                    distance_km: distance,
                })
            })
            .collect();

        found.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| a.position.driver_id.cmp(&b.position.driver_id))
        });
        found.truncate(limit);
        found
    }

    /// Number of entries physically held, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries currently fresh.
    pub fn fresh_count(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .iter()
            .filter(|entry| !entry.is_stale(now, self.stale_after))
            .count()
    }

    /// Subscribe to driver lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<PositionEvent> {
        self.events.subscribe()
    }
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new(PositionStoreConfig::default())
    }
}
