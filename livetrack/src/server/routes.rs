//! Request handlers.
//!
//! Handlers only translate between HTTP and the tracking services; all
//! validation rules live in [`crate::tracking`] and [`crate::position`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

use super::error::ApiError;
use super::payload::{
    AckResponse, HealthResponse, NearbyEntry, NearbyParams, NearbyResponse, OfflineResponse,
    TrackingResponse,
};
use super::state::AppState;
use crate::assignment::AssignmentResolver;
use crate::position::Coordinate;
use crate::tracking::TrackingError;

/// Search radius used when a nearby query does not give one.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// `POST /driver/location`
pub async fn report_location<R: AssignmentResolver>(
    State(state): State<Arc<AppState<R>>>,
    body: Bytes,
) -> Result<Json<AckResponse>, ApiError> {
    state.ingest.ingest_json(&body)?;
    Ok(Json(AckResponse { success: true }))
}

/// `DELETE /driver/location/{driver_id}`
pub async fn go_offline<R: AssignmentResolver>(
    State(state): State<Arc<AppState<R>>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<OfflineResponse>, ApiError> {
    let Path(driver_id) = path?;
    let removed = state.ingest.go_offline(&driver_id)?;
    Ok(Json(OfflineResponse {
        success: true,
        removed,
    }))
}

/// `GET /orders/{order_id}/tracking`
pub async fn track_order<R: AssignmentResolver>(
    State(state): State<Arc<AppState<R>>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let Path(order_id) = path?;
    let result = state.lookup.track_raw(&order_id).await?;
    tracing::trace!(
        order_id = %result.order_id,
        state = ?result.state(),
        "Tracking lookup served"
    );
    Ok(Json(TrackingResponse::from(result)))
}

/// `GET /drivers/nearby?lat=..&lng=..&radius_km=..&limit=..`
pub async fn nearby_drivers<R: AssignmentResolver>(
    State(state): State<Arc<AppState<R>>>,
    query: Result<Query<NearbyParams>, QueryRejection>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let Query(params) = query?;
    let latitude = required_number("lat", params.lat.as_deref())?;
    let longitude = required_number("lng", params.lng.as_deref())?;
    let center = Coordinate::new(latitude, longitude).map_err(TrackingError::from)?;

    let radius_km = match params.radius_km.as_deref() {
        None => DEFAULT_NEARBY_RADIUS_KM,
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(r) if r.is_finite() && r > 0.0 => r,
            _ => return Err(bad_request("radius_km must be a positive number")),
        },
    };

    let limit = match params.limit.as_deref() {
        None => state.nearby_limit,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => n.min(state.nearby_limit),
            _ => return Err(bad_request("limit must be a positive integer")),
        },
    };

    let drivers = state
        .store
        .nearest(center, radius_km, limit)
        .into_iter()
        .map(NearbyEntry::from)
        .collect();

    Ok(Json(NearbyResponse {
        success: true,
        drivers,
    }))
}

/// `GET /health`
pub async fn health<R: AssignmentResolver>(
    State(state): State<Arc<AppState<R>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        version: crate::VERSION,
        drivers_tracked: state.store.len(),
        drivers_fresh: state.store.fresh_count(),
    })
}

fn bad_request(message: &str) -> ApiError {
    ApiError(TrackingError::BadRequest(message.to_string()))
}

fn required_number(field: &str, raw: Option<&str>) -> Result<f64, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| bad_request(&format!("{field} is required")))?;
    raw.parse()
        .map_err(|_| bad_request(&format!("{field} must be a number")))
}
