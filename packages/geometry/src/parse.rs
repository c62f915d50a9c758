//! Validated `GeoJSON` geometry parsing.
//!
//! Accepts `Polygon` and `MultiPolygon` geometry values. Rings that are
//! too short or carry non-finite coordinates are skipped, never fatal:
//! a polygon with a bad interior ring keeps its exterior, a polygon
//! with a bad exterior is dropped entirely.

use geo::{MultiPolygon, Polygon};

/// Minimum coordinate pairs for a closed ring (triangle + closing pair).
pub const MIN_RING_COORDS: usize = 4;

/// Parses a `GeoJSON` geometry value into a validated [`MultiPolygon`].
///
/// Handles both `Polygon` and `MultiPolygon` geometry types. Returns
/// `None` for null/absent geometry, non-areal geometry types, or
/// geometry with no valid polygon left after ring validation.
#[must_use]
pub fn multipolygon_from_value(value: &serde_json::Value) -> Option<MultiPolygon<f64>> {
    if value.is_null() {
        return None;
    }

    let geometry: geojson::Geometry = serde_json::from_value(value.clone()).ok()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;

    let raw = match geo_geom {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => return None,
    };

    let polygons: Vec<Polygon<f64>> = raw.0.into_iter().filter_map(validate_polygon).collect();

    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon(polygons))
    }
}

/// Drops invalid interior rings; drops the whole polygon if the
/// exterior ring is invalid.
fn validate_polygon(polygon: Polygon<f64>) -> Option<Polygon<f64>> {
    let (exterior, interiors) = polygon.into_inner();

    if !ring_is_valid(&exterior) {
        return None;
    }

    let interiors = interiors.into_iter().filter(ring_is_valid).collect();
    Some(Polygon::new(exterior, interiors))
}

fn ring_is_valid(ring: &geo::LineString<f64>) -> bool {
    ring.0.len() >= MIN_RING_COORDS && ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_polygon() {
        let value = serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
        });
        let mp = multipolygon_from_value(&value).unwrap();
        assert_eq!(mp.0.len(), 1);
    }

    #[test]
    fn parses_a_multipolygon() {
        let value = serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]],
            ],
        });
        let mp = multipolygon_from_value(&value).unwrap();
        assert_eq!(mp.0.len(), 2);
    }

    #[test]
    fn rejects_null_and_non_areal_geometry() {
        assert!(multipolygon_from_value(&serde_json::Value::Null).is_none());

        let point = serde_json::json!({"type": "Point", "coordinates": [0.0, 0.0]});
        assert!(multipolygon_from_value(&point).is_none());
    }

    #[test]
    fn skips_polygons_with_short_exterior_rings() {
        let value = serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]],
                [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]],
            ],
        });
        let mp = multipolygon_from_value(&value).unwrap();
        assert_eq!(mp.0.len(), 1, "short-ring polygon should be skipped");
    }

    #[test]
    fn drops_invalid_interior_rings_but_keeps_the_polygon() {
        let value = serde_json::json!({
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                [[1.0, 1.0], [2.0, 1.0], [1.0, 1.0]],
            ],
        });
        let mp = multipolygon_from_value(&value).unwrap();
        assert_eq!(mp.0[0].interiors().len(), 0);
    }
}
