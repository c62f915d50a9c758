//! Regular point-grid sampling over a bounding box, masked to a
//! polygon.
//!
//! The sampling-based coverage estimator trades exactness for bounded
//! latency; the grid spacing is its accuracy knob.

use geo::{Contains, MultiPolygon, Point};
use rstar::AABB;

use crate::units;

/// Generates a regular grid of points over `bounds` at `spacing_miles`,
/// keeping only points inside `mask`.
///
/// The longitude step is scaled at the box's center latitude so the
/// grid is (approximately) square in ground distance. Returns an empty
/// vector for degenerate bounds or spacing.
#[must_use]
pub fn sample_points(
    bounds: &AABB<[f64; 2]>,
    spacing_miles: f64,
    mask: &MultiPolygon<f64>,
) -> Vec<Point<f64>> {
    let [min_x, min_y] = bounds.lower();
    let [max_x, max_y] = bounds.upper();

    let center_lat = (min_y + max_y) / 2.0;
    let step_x = units::lon_degrees(spacing_miles, center_lat);
    let step_y = units::lat_degrees(spacing_miles);

    if !(step_x > 0.0 && step_x.is_finite() && step_y > 0.0 && step_y.is_finite()) {
        return Vec::new();
    }

    let mut points = Vec::new();
    let mut y = min_y;
    while y <= max_y {
        let mut x = min_x;
        while x <= max_x {
            let point = Point::new(x, y);
            if mask.contains(&point) {
                points.push(point);
            }
            x += step_x;
        }
        y += step_y;
    }

    points
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Polygon};

    use super::*;

    fn square(min: f64, max: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![
                (min, min),
                (max, min),
                (max, max),
                (min, max),
                (min, min),
            ]),
            vec![],
        )])
    }

    #[test]
    fn grid_covers_the_masked_area() {
        // A 0.1-degree square at the equator is ~6.9 miles across, so a
        // 0.69-mile spacing yields roughly a 10x10 interior lattice.
        let mask = square(0.0, 0.1);
        let bounds = crate::bbox::envelope(&mask).unwrap();

        let points = sample_points(&bounds, 0.69, &mask);
        assert!(points.len() > 80, "expected a dense grid, got {}", points.len());
        assert!(points.iter().all(|p| mask.contains(p)));
    }

    #[test]
    fn mask_excludes_points_outside_the_polygon() {
        // Mask is the lower-left quarter of the bounds.
        let mask = square(0.0, 0.05);
        let bounds = crate::bbox::envelope(&square(0.0, 0.1)).unwrap();

        let all = sample_points(&bounds, 0.69, &square(0.0, 0.1));
        let masked = sample_points(&bounds, 0.69, &mask);
        assert!(masked.len() < all.len() / 2);
    }

    #[test]
    fn degenerate_spacing_produces_no_points() {
        let mask = square(0.0, 0.1);
        let bounds = crate::bbox::envelope(&mask).unwrap();
        assert!(sample_points(&bounds, 0.0, &mask).is_empty());
    }
}
