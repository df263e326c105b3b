//! JSON response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assignment::DriverContact;
use crate::position::{DriverId, DriverPosition, NearbyDriver};
use crate::tracking::{TrackingResult, TrackingState};

pub const MSG_NO_DRIVER: &str = "No driver assigned yet";
pub const MSG_WAITING_FOR_LOCATION: &str = "Driver location waiting...";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct OfflineResponse {
    pub success: bool,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct DriverLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<DriverPosition> for DriverLocation {
    fn from(p: DriverPosition) -> Self {
        Self {
            latitude: p.latitude,
            longitude: p.longitude,
            recorded_at: p.recorded_at,
        }
    }
}

/// Driver contact details shown to the customer.
#[derive(Debug, Serialize)]
pub struct DriverSummary {
    pub name: String,
    pub mobile_no: String,
}

impl From<DriverContact> for DriverSummary {
    fn from(c: DriverContact) -> Self {
        Self {
            name: c.name,
            mobile_no: c.mobile_no,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub success: bool,
    pub status: String,
    pub driver_location: Option<DriverLocation>,
    pub driver: Option<DriverSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<TrackingResult> for TrackingResponse {
    fn from(result: TrackingResult) -> Self {
        let message = match result.state() {
            TrackingState::AwaitingDriver => Some(MSG_NO_DRIVER),
            TrackingState::AwaitingPosition => Some(MSG_WAITING_FOR_LOCATION),
            TrackingState::Live => None,
        };

        Self {
            success: true,
            status: result.status,
            driver_location: result.position.map(DriverLocation::from),
            driver: result.driver.map(DriverSummary::from),
            message,
        }
    }
}

/// Raw nearby-query parameters; validated by the handler so every failure
/// gets the same JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius_km: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NearbyEntry {
    pub driver_id: DriverId,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<NearbyDriver> for NearbyEntry {
    fn from(n: NearbyDriver) -> Self {
        Self {
            driver_id: n.position.driver_id,
            latitude: n.position.latitude,
            longitude: n.position.longitude,
            distance_km: n.distance_km,
            recorded_at: n.position.recorded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub success: bool,
    pub drivers: Vec<NearbyEntry>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub version: &'static str,
    pub drivers_tracked: usize,
    pub drivers_fresh: usize,
}
