//! Great-circle distance helpers.

use super::state::Coordinate;

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Calculate the great-circle distance between two coordinates.
///
/// Uses the haversine formula, which is accurate over the short distances
/// involved in delivery tracking.
///
/// # Example
///
/// ```
/// use livetrack::position::{distance_km, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(1.0, 0.0).unwrap();
/// assert!((distance_km(a, b) - 111.19).abs() < 0.1);
/// ```
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude * DEG_TO_RAD;
    let lat2_rad = to.latitude * DEG_TO_RAD;
    let delta_lat = (to.latitude - from.latitude) * DEG_TO_RAD;
    let delta_lon = (to.longitude - from.longitude) * DEG_TO_RAD;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Clamp guards against rounding pushing `a` just above 1 for antipodes
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_zero_distance() {
        let p = coord(26.91, 75.78);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_latitude() {
        let d = distance_km(coord(0.0, 0.0), coord(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = coord(26.91, 75.78);
        let b = coord(26.85, 75.80);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_city_scale_distance() {
        // Jaipur: Hawa Mahal to Jaipur Junction, roughly 3.9 km apart
        let d = distance_km(coord(26.9239, 75.8267), coord(26.9196, 75.7878));
        assert!(d > 3.5 && d < 4.5, "got {d}");
    }

    #[test]
    fn test_antipodes() {
        let d = distance_km(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.01);
    }

    #[test]
    fn test_across_antimeridian() {
        let d = distance_km(coord(0.0, 179.5), coord(0.0, -179.5));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }
}
