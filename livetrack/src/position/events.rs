//! Driver lifecycle events published by the position store.
//!
//! Only transitions are published: a driver coming online (first report, or
//! first report after going stale), going offline explicitly, or being
//! evicted after prolonged silence. Routine position pings are not events.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::{DriverId, DriverPosition};

/// A driver lifecycle transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PositionEvent {
    /// First fresh position for a driver that had none.
    DriverOnline { position: DriverPosition },

    /// Driver signalled it is offline and its entry was removed.
    DriverOffline { driver_id: DriverId },

    /// Entry evicted by the sweeper after the grace window elapsed.
    DriverExpired {
        driver_id: DriverId,
        last_seen: DateTime<Utc>,
    },
}

impl PositionEvent {
    /// Driver the event refers to.
    pub fn driver_id(&self) -> &DriverId {
        match self {
            Self::DriverOnline { position } => &position.driver_id,
            Self::DriverOffline { driver_id } | Self::DriverExpired { driver_id, .. } => driver_id,
        }
    }

    /// Short event name, matching the serialized `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DriverOnline { .. } => "driver_online",
            Self::DriverOffline { .. } => "driver_offline",
            Self::DriverExpired { .. } => "driver_expired",
        }
    }
}
