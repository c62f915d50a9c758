//! Bounding-box computation for the R-tree pre-filters.

use geo::{BoundingRect, MultiPolygon, Point};
use rstar::{AABB, Envelope as _};

/// Computes the axis-aligned bounding box of a [`MultiPolygon`].
///
/// Returns `None` for empty geometry.
#[must_use]
pub fn envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}

/// Cheap point-in-bounding-box test, used before any exact
/// point-in-polygon computation.
#[must_use]
pub fn contains_point(aabb: &AABB<[f64; 2]>, point: Point<f64>) -> bool {
    aabb.contains_point(&[point.x(), point.y()])
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
    fn envelope_spans_the_geometry() {
        let aabb = envelope(&square(0.0, 2.0)).unwrap();
        assert_eq!(aabb.lower(), [0.0, 0.0]);
        assert_eq!(aabb.upper(), [2.0, 2.0]);
    }

    #[test]
    fn envelope_of_empty_geometry_is_none() {
        assert!(envelope(&MultiPolygon(vec![])).is_none());
    }

    #[test]
    fn point_containment() {
        let aabb = envelope(&square(0.0, 2.0)).unwrap();
        assert!(contains_point(&aabb, Point::new(1.0, 1.0)));
        assert!(!contains_point(&aabb, Point::new(3.0, 1.0)));
    }
}
