//! Geographic points and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether the coordinates are finite and inside the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_meters(*self, *other)
    }
}

/// Haversine distance between two points, in meters.
///
/// The intermediate term is clamped to `[0, 1]` so rounding on antipodal or
/// identical points never produces NaN.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// A resolved stop location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub point: GeoPoint,
    /// Human-readable address, if the resolver supplied one
    #[serde(default)]
    pub address: Option<String>,
}

impl Location {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(48.8566, 2.3522);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn paris_to_london_is_about_344_km() {
        let paris = GeoPoint::new(48.8566, 2.3522);
        let london = GeoPoint::new(51.5074, -0.1278);
        let km = paris.distance_to(&london) / 1000.0;
        assert!((km - 343.5).abs() < 2.0, "got {km}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(-33.8688, 151.2093);
        let b = GeoPoint::new(35.6762, 139.6503);
        let ab = haversine_meters(a, b);
        let ba = haversine_meters(b, a);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = haversine_meters(a, b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }

    #[test]
    fn validity_checks_ranges() {
        assert!(GeoPoint::new(90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }
}
