#![deny(missing_docs)]
//! Geospatial primitives shared by the listing discovery stack.
//!
//! Everything here is plain math over longitude/latitude pairs; the storage
//! layer decides how these values end up in actual queries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Earth radius in kilometers, used for radius style range bounds.
pub const EARTH_RADIUS_KM: f64 = 6378.1;

/// A geographic point. Longitude first, matching GeoJSON ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    /// degrees east, in [-180, 180]
    pub longitude: f64,
    /// degrees north, in [-90, 90]
    pub latitude: f64,
}

impl GeoPoint {
    /// create a point without validating it, see [GeoPoint::is_valid]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        GeoPoint {
            longitude,
            latitude,
        }
    }

    /// true iff both components are finite and within their valid ranges
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

/// convert a radius in kilometers into radians on the Earth sphere
pub fn km_to_radians(km: f64) -> f64 {
    km / EARTH_RADIUS_KM
}

/// convert kilometers into meters, for nearest-first max-distance bounds
pub fn km_to_meters(km: f64) -> f64 {
    km * 1000.0
}

/// great-circle distance between two points in kilometers
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Pick the location a search should be centered on.
///
/// A live location wins over the stored home location, but only when it
/// passes validation; an invalid live location falls back to home rather
/// than erroring.
pub fn resolve_effective_location(
    current: Option<GeoPoint>,
    home: Option<GeoPoint>,
) -> Option<GeoPoint> {
    current
        .filter(GeoPoint::is_valid)
        .or_else(|| home.filter(GeoPoint::is_valid))
}
