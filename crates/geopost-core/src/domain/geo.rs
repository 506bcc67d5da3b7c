//! Coordinate and distance utilities. Pure functions, no state.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, spherical model.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Kilometers spanned by one degree of latitude. The same factor is
/// applied to longitude when building search boxes, which is accurate
/// near the equator and increasingly distorted at higher latitudes.
pub const KILOMETERS_PER_DEGREE: f64 = 111.12;

/// A WGS84 coordinate pair in degrees.
///
/// Ranges are not validated; callers are expected to supply longitude
/// in [-180, 180] and latitude in [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// Great-circle distance between two points in meters (Haversine).
pub fn haversine_meters(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Convert a radius in kilometers to an equivalent span in degrees.
pub fn degree_span(kilometers: f64) -> f64 {
    kilometers / KILOMETERS_PER_DEGREE
}

/// Axis-aligned search rectangle in degree space, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Box approximating a circular radius around `center`. Both axes
    /// use the same degree span, so the result is a square that over-
    /// and under-covers the true disc away from the equator.
    pub fn around(center: Coordinates, radius_km: f64) -> Self {
        let span = degree_span(radius_km);
        Self {
            min_lon: center.longitude - span,
            max_lon: center.longitude + span,
            min_lat: center.latitude - span,
            max_lat: center.latitude + span,
        }
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
            && point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
    }
}
