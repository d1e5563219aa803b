//! Distance calculations on a spherical Earth.
//!
//! Uses the Haversine formula with a fixed 6,371 km radius, so arrival and
//! ETA figures are stable across `geo` releases.

use geo::Point;

/// Earth radius used for every distance, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate Haversine distance between two points in meters
///
/// Points follow the `geo` convention (x = longitude, y = latitude).
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    let d_lat = (p2.y() - p1.y()).to_radians();
    let d_lon = (p2.x() - p1.x()).to_radians();
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
