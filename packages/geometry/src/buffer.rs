//! Outward polygon buffering in miles.
//!
//! `geo-buffer`'s straight-skeleton buffer works in planar coordinates,
//! so the geometry is scaled into a mile plane at its own centroid,
//! buffered there, and scaled back to lon/lat. The latitude-dependent
//! longitude scale keeps the buffer width uniform in ground distance.

use geo::{Centroid, Coord, MapCoords, MultiPolygon};

use crate::units::MILES_PER_DEGREE;

/// Buffers a polygon outward by `miles`.
///
/// Returns `None` for empty/degenerate geometry or when buffering
/// produces nothing (the caller treats that as a skippable feature, not
/// an error).
#[must_use]
pub fn buffer_outward_miles(mp: &MultiPolygon<f64>, miles: f64) -> Option<MultiPolygon<f64>> {
    let center = mp.centroid()?;

    let lon_scale = MILES_PER_DEGREE * center.y().to_radians().cos();
    let lat_scale = MILES_PER_DEGREE;
    if lon_scale <= f64::EPSILON {
        return None;
    }

    let planar = mp.map_coords(|c| Coord {
        x: (c.x - center.x()) * lon_scale,
        y: (c.y - center.y()) * lat_scale,
    });

    let buffered = geo_buffer::buffer_multi_polygon(&planar, miles);
    if buffered.0.is_empty() {
        return None;
    }

    Some(buffered.map_coords(|c| Coord {
        x: c.x / lon_scale + center.x(),
        y: c.y / lat_scale + center.y(),
    }))
}

#[cfg(test)]
mod tests {
    use geo::{Contains, LineString, Point, Polygon};

    use super::*;

    fn city_block() -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![
                (-87.64, 41.87),
                (-87.62, 41.87),
                (-87.62, 41.89),
                (-87.64, 41.89),
                (-87.64, 41.87),
            ]),
            vec![],
        )])
    }

    #[test]
    fn buffer_contains_every_source_vertex() {
        let source = city_block();
        let buffered = buffer_outward_miles(&source, 0.2).unwrap();

        for polygon in &source {
            for coord in polygon.exterior() {
                assert!(
                    buffered.contains(&Point::new(coord.x, coord.y)),
                    "source vertex ({}, {}) escaped the buffer",
                    coord.x,
                    coord.y
                );
            }
        }
    }

    #[test]
    fn buffer_extends_beyond_the_source_envelope() {
        let buffered = buffer_outward_miles(&city_block(), 0.2).unwrap();
        let aabb = crate::bbox::envelope(&buffered).unwrap();

        // 0.2 miles of latitude is ~0.0029 degrees.
        assert!(aabb.lower()[1] < 41.87 - 0.002);
        assert!(aabb.upper()[1] > 41.89 + 0.002);
    }

    #[test]
    fn empty_geometry_buffers_to_none() {
        assert!(buffer_outward_miles(&MultiPolygon(vec![]), 0.2).is_none());
    }
}
