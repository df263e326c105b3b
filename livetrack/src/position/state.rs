//! Core value types for driver position tracking.
//!
//! - [`DriverId`] - Stable, externally assigned driver identifier
//! - [`Coordinate`] - Validated latitude/longitude pair in degrees
//! - [`DriverPosition`] - Latest accepted report for one driver

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::error::PositionError;

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Identifier of a delivery driver.
///
/// Driver clients send either a string or an integer; both are normalized to
/// the trimmed decimal/string form so `42` and `"42"` name the same driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "RawDriverId")]
pub struct DriverId(String);

impl DriverId {
    /// Parse a driver id, rejecting empty or whitespace-only input.
    pub fn parse(raw: &str) -> Result<Self, PositionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PositionError::EmptyDriverId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Driver id from a numeric identifier.
    pub fn from_number(id: u64) -> Self {
        Self(id.to_string())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DriverId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Wire shape accepted for driver ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDriverId {
    Text(String),
    Number(u64),
}

impl TryFrom<RawDriverId> for DriverId {
    type Error = PositionError;

    fn try_from(raw: RawDriverId) -> Result<Self, Self::Error> {
        match raw {
            RawDriverId::Text(text) => Self::parse(&text),
            RawDriverId::Number(n) => Ok(Self::from_number(n)),
        }
    }
}

/// A validated geographic coordinate.
///
/// Construction through [`Coordinate::new`] guarantees both components are
/// finite and within their valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Validate and build a coordinate.
    ///
    /// # Errors
    ///
    /// [`PositionError::InvalidCoordinate`] if either component is NaN,
    /// infinite, or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PositionError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && LATITUDE_RANGE.contains(&latitude)
            && LONGITUDE_RANGE.contains(&longitude);

        if !valid {
            return Err(PositionError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// The latest accepted position report for a driver.
///
/// At most one exists per driver; a newer report replaces it outright.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverPosition {
    pub driver_id: DriverId,
    pub latitude: f64,
    pub longitude: f64,
    /// Server time at which the report was accepted.
    pub recorded_at: DateTime<Utc>,
}

impl DriverPosition {
    pub fn new(driver_id: DriverId, coordinate: Coordinate, recorded_at: DateTime<Utc>) -> Self {
        Self {
            driver_id,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            recorded_at,
        }
    }

    /// The position as a coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Age of the report relative to `now` (negative if recorded in the future).
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.recorded_at)
    }

    /// Whether the report was stamped after `now`, i.e. the clock that
    /// stamped it has since moved backwards.
    pub fn is_ahead_of(&self, now: DateTime<Utc>) -> bool {
        self.recorded_at > now
    }

    /// Whether the report is older than `threshold` at `now`.
    ///
    /// A report stamped ahead of `now` has no trustworthy age and counts as
    /// stale.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: TimeDelta) -> bool {
        self.is_ahead_of(now) || self.age(now) > threshold
    }
}
