//! Mile/degree conversions and mile-plane distance primitives.
//!
//! Uses the standard city-scale planar approximation: one degree of
//! latitude is 69 miles everywhere, one degree of longitude is
//! `69 * cos(latitude)` miles. Not valid globally; fine for a single
//! metro area.

use geo::{Coord, Point};

/// Miles per degree of latitude (and of longitude at the equator).
pub const MILES_PER_DEGREE: f64 = 69.0;

/// Converts miles to degrees of latitude.
#[must_use]
pub fn lat_degrees(miles: f64) -> f64 {
    miles / MILES_PER_DEGREE
}

/// Converts miles to degrees of longitude at the given latitude.
#[must_use]
pub fn lon_degrees(miles: f64, latitude: f64) -> f64 {
    miles / (MILES_PER_DEGREE * latitude.to_radians().cos())
}

/// Projects a lon/lat coordinate into a planar mile coordinate system
/// centered on `origin`.
#[must_use]
pub fn to_local_miles(origin: Point<f64>, coord: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (coord.x - origin.x()) * MILES_PER_DEGREE * origin.y().to_radians().cos(),
        y: (coord.y - origin.y()) * MILES_PER_DEGREE,
    }
}

/// Exact distance in miles from a point to a line segment, both given
/// in lon/lat degrees.
///
/// The segment endpoints are projected into the mile plane centered on
/// the query point before the usual point-to-segment computation, so
/// longitude is correctly scaled by latitude.
#[must_use]
pub fn point_to_segment_miles(point: Point<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
    let a = to_local_miles(point, start);
    let b = to_local_miles(point, end);

    // The query point is the local origin.
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);

    if length_sq <= f64::EPSILON {
        return a.x.hypot(a.y);
    }

    let t = (-(a.x * dx + a.y * dy) / length_sq).clamp(0.0, 1.0);
    let cx = t.mul_add(dx, a.x);
    let cy = t.mul_add(dy, a.y);
    cx.hypot(cy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lon_degrees_matches_lat_degrees_at_the_equator() {
        assert!((lon_degrees(6.9, 0.0) - 0.1).abs() < 1e-12);
        assert!((lat_degrees(6.9) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn lon_degrees_grows_with_latitude() {
        assert!(lon_degrees(1.0, 60.0) > lon_degrees(1.0, 0.0));
    }

    #[test]
    fn segment_distance_perpendicular_case() {
        // Horizontal segment one latitude-hundredth (0.69 mi) below the
        // query point.
        let point = Point::new(-87.6, 41.88);
        let start = Coord { x: -87.7, y: 41.87 };
        let end = Coord { x: -87.5, y: 41.87 };
        let distance = point_to_segment_miles(point, start, end);
        assert!((distance - 0.69).abs() < 1e-9);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        // Query point lies beyond the end of the segment; nearest point
        // is the endpoint itself.
        let point = Point::new(-87.6, 41.88);
        let start = Coord { x: -87.7, y: 41.88 };
        let end = Coord { x: -87.65, y: 41.88 };
        let expected = (0.05_f64 * MILES_PER_DEGREE * 41.88_f64.to_radians().cos()).abs();
        let distance = point_to_segment_miles(point, start, end);
        assert!((distance - expected).abs() < 1e-9);
    }

    #[test]
    fn degenerate_segment_is_point_distance() {
        let point = Point::new(-87.6, 41.88);
        let coord = Coord { x: -87.6, y: 41.87 };
        let distance = point_to_segment_miles(point, coord, coord);
        assert!((distance - 0.69).abs() < 1e-9);
    }
}
