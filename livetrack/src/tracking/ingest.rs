//! Ingest - the driver position write path.
//!
//! Validates a driver report at the boundary and hands it to the
//! [`PositionStore`]. The report timestamp is assigned here, from the
//! server clock, so client clocks are never trusted for ordering.
//!
//! Ingest is stateless: no read-before-write, one store mutation per
//! accepted report.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::TrackingError;
use crate::position::{DriverId, PositionStore, UpsertOutcome};

/// A validated position report from a driver client.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    pub driver_id: DriverId,
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionReport {
    /// Parse a JSON report body `{driver_id, lat, lng}`.
    ///
    /// `driver_id` may be a string or an integer; `lat`/`lng` may be numbers
    /// or numeric strings. Range checks happen on upsert.
    pub fn from_json(body: &[u8]) -> Result<Self, TrackingError> {
        let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(body) else {
            return Err(TrackingError::BadRequest(
                "body must be a JSON object".to_string(),
            ));
        };

        Ok(Self {
            driver_id: parse_driver_id(fields.remove("driver_id"))?,
            latitude: parse_degrees("lat", fields.remove("lat"))?,
            longitude: parse_degrees("lng", fields.remove("lng"))?,
        })
    }
}

fn parse_driver_id(value: Option<Value>) -> Result<DriverId, TrackingError> {
    let invalid = || {
        TrackingError::BadRequest("driver_id must be a non-empty string or integer".to_string())
    };

    match value {
        None | Some(Value::Null) => Err(TrackingError::BadRequest(
            "driver_id is required".to_string(),
        )),
        Some(Value::String(text)) => DriverId::parse(&text).map_err(|_| invalid()),
        Some(Value::Number(n)) => n.as_u64().map(DriverId::from_number).ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

fn parse_degrees(field: &str, value: Option<Value>) -> Result<f64, TrackingError> {
    let parsed = match value {
        None | Some(Value::Null) => {
            return Err(TrackingError::BadRequest(format!("{field} is required")));
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed.ok_or_else(|| TrackingError::BadRequest(format!("{field} must be a number")))
}

/// Acknowledgment of an accepted report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestAck {
    pub recorded_at: DateTime<Utc>,
    pub outcome: UpsertOutcome,
}

/// Write path for driver position reports.
#[derive(Clone)]
pub struct IngestService {
    store: Arc<PositionStore>,
}

impl IngestService {
    pub fn new(store: Arc<PositionStore>) -> Self {
        Self { store }
    }

    /// Stamp and store a validated report.
    ///
    /// # Errors
    ///
    /// [`TrackingError::BadRequest`] if the coordinate is out of range or
    /// not finite; the store is untouched.
    pub fn ingest(&self, report: PositionReport) -> Result<IngestAck, TrackingError> {
        let recorded_at = self.store.now();
        let driver_id = report.driver_id;

        let outcome = self
            .store
            .upsert(
                driver_id.clone(),
                report.latitude,
                report.longitude,
                recorded_at,
            )
            .map_err(|e| {
                tracing::debug!(driver_id = %driver_id, error = %e, "Rejected position report");
                TrackingError::from(e)
            })?;

        tracing::trace!(
            driver_id = %driver_id,
            lat = report.latitude,
            lng = report.longitude,
            applied = outcome.is_applied(),
            "Position report accepted"
        );

        Ok(IngestAck {
            recorded_at,
            outcome,
        })
    }

    /// Parse and ingest a raw JSON body.
    pub fn ingest_json(&self, body: &[u8]) -> Result<IngestAck, TrackingError> {
        let report = PositionReport::from_json(body).inspect_err(|e| {
            tracing::debug!(error = %e, "Malformed position report");
        })?;
        self.ingest(report)
    }

    /// Explicit driver-offline signal. Returns whether an entry was removed.
    pub fn go_offline(&self, driver_id: &str) -> Result<bool, TrackingError> {
        let driver_id = DriverId::parse(driver_id)?;
        let removed = self.store.remove(&driver_id).is_some();
        tracing::debug!(driver_id = %driver_id, removed, "Driver went offline");
        Ok(removed)
    }
}
