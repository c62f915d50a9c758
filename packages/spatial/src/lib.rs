#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory nearest-boundary distance index.
//!
//! Builds an R-tree over park boundary lines and answers "how far is
//! this point from the nearest park edge" queries. Distances are
//! measured to the boundary, not the centroid or the filled area,
//! because proximity value accrues from the nearest park edge.
//!
//! Queries run in two stages: a bounding-box pre-filter against the
//! R-tree, then exact point-to-segment distance for the survivors.
//! That is what keeps per-frame hover queries tractable against
//! hundreds of park polygons.

use geo::{LineString, MultiPolygon, Point};
use parkside_dataset_models::ParkFeature;
use parkside_geometry::{bbox, units};
use rstar::{AABB, RTree, RTreeObject};

/// A park boundary stored in the R-tree with its metadata.
struct BoundaryEntry {
    park_id: i64,
    name: String,
    envelope: AABB<[f64; 2]>,
    rings: Vec<LineString<f64>>,
}

impl RTreeObject for BoundaryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl BoundaryEntry {
    /// Exact minimum distance from `point` to any boundary segment.
    fn min_distance_miles(&self, point: Point<f64>) -> f64 {
        self.rings
            .iter()
            .flat_map(LineString::lines)
            .map(|line| units::point_to_segment_miles(point, line.start, line.end))
            .fold(f64::INFINITY, f64::min)
    }
}

/// The nearest park boundary found for a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestBoundary {
    /// Source park id.
    pub park_id: i64,
    /// Source park name.
    pub name: String,
    /// Distance from the query point to the park edge, in miles.
    pub distance_miles: f64,
}

/// Pre-built spatial index over park boundaries.
///
/// Rebuilt wholesale whenever the park set changes; never mutated
/// incrementally, so there is no partial-update state to race against.
pub struct BoundaryIndex {
    tree: RTree<BoundaryEntry>,
}

impl BoundaryIndex {
    /// Builds the index from park features.
    ///
    /// Parks without usable geometry are skipped and logged, never
    /// fatal: one degenerate polygon must not take down the index.
    #[must_use]
    pub fn build(parks: &[ParkFeature]) -> Self {
        let mut entries = Vec::new();

        for park in parks {
            let Some(geometry) = &park.geometry else {
                continue;
            };

            let Some(envelope) = bbox::envelope(geometry) else {
                log::warn!(
                    "Skipping park {} ({}): degenerate geometry",
                    park.id,
                    park.name
                );
                continue;
            };

            let rings = boundary_rings(geometry);
            if rings.is_empty() {
                log::warn!(
                    "Skipping park {} ({}): boundary conversion produced no lines",
                    park.id,
                    park.name
                );
                continue;
            }

            entries.push(BoundaryEntry {
                park_id: park.id,
                name: park.name.clone(),
                envelope,
                rings,
            });
        }

        log::info!("Built boundary index over {} park boundaries", entries.len());

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed park boundaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no boundaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Finds the nearest park boundary within `max_miles` of `point`.
    ///
    /// Only entries whose bounding box intersects the expanded query
    /// box are measured exactly; returns `None` when nothing indexed is
    /// within range.
    #[must_use]
    pub fn nearest_boundary(&self, point: Point<f64>, max_miles: f64) -> Option<NearestBoundary> {
        let query = Self::query_envelope(point, max_miles);

        let mut candidates = 0usize;
        let mut best: Option<NearestBoundary> = None;

        for entry in self.tree.locate_in_envelope_intersecting(&query) {
            candidates += 1;
            let distance_miles = entry.min_distance_miles(point);
            if distance_miles <= max_miles
                && best
                    .as_ref()
                    .is_none_or(|b| distance_miles < b.distance_miles)
            {
                best = Some(NearestBoundary {
                    park_id: entry.park_id,
                    name: entry.name.clone(),
                    distance_miles,
                });
            }
        }

        log::debug!(
            "Boundary query at ({:.5}, {:.5}): {candidates} candidates within {max_miles} mi",
            point.x(),
            point.y()
        );

        best
    }

    /// How many boundary entries the bounding-box pre-filter admits for
    /// a query, before any exact distance computation.
    #[must_use]
    pub fn candidate_count(&self, point: Point<f64>, max_miles: f64) -> usize {
        self.tree
            .locate_in_envelope_intersecting(&Self::query_envelope(point, max_miles))
            .count()
    }

    /// Query box around a point, expanded by `max_miles` converted to
    /// degrees with the latitude-dependent longitude scale.
    fn query_envelope(point: Point<f64>, max_miles: f64) -> AABB<[f64; 2]> {
        let d_lat = units::lat_degrees(max_miles);
        let d_lon = units::lon_degrees(max_miles, point.y());
        AABB::from_corners(
            [point.x() - d_lon, point.y() - d_lat],
            [point.x() + d_lon, point.y() + d_lat],
        )
    }
}

/// Converts a polygon's rings (exterior and interior) into boundary
/// lines.
fn boundary_rings(geometry: &MultiPolygon<f64>) -> Vec<LineString<f64>> {
    geometry
        .iter()
        .flat_map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors().iter())
                .cloned()
        })
        .filter(|ring| ring.0.len() >= 2)
        .collect()
}

#[cfg(test)]
mod tests {
    use geo::Polygon;

    use super::*;

    fn park(id: i64, name: &str, min: (f64, f64), max: (f64, f64)) -> ParkFeature {
        ParkFeature {
            id,
            name: name.to_string(),
            acreage: 10.0,
            geometry: Some(MultiPolygon(vec![Polygon::new(
                LineString::from(vec![
                    (min.0, min.1),
                    (max.0, min.1),
                    (max.0, max.1),
                    (min.0, max.1),
                    (min.0, min.1),
                ]),
                vec![],
            )])),
        }
    }

    fn geometryless_park(id: i64) -> ParkFeature {
        ParkFeature {
            id,
            name: "NO GEOMETRY".to_string(),
            acreage: 0.0,
            geometry: None,
        }
    }

    #[test]
    fn skips_parks_without_geometry() {
        let index = BoundaryIndex::build(&[
            park(1, "A", (-87.64, 41.87), (-87.62, 41.89)),
            geometryless_park(2),
        ]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn point_on_the_boundary_is_at_distance_zero() {
        let index = BoundaryIndex::build(&[park(1, "A", (-87.64, 41.87), (-87.62, 41.89))]);

        let nearest = index
            .nearest_boundary(Point::new(-87.63, 41.87), 0.8)
            .unwrap();
        assert_eq!(nearest.park_id, 1);
        assert!(nearest.distance_miles < 1e-9);
    }

    #[test]
    fn distance_is_measured_to_the_edge_not_the_interior() {
        let index = BoundaryIndex::build(&[park(1, "A", (-87.64, 41.87), (-87.62, 41.89))]);

        // 0.005 degrees of latitude south of the southern edge: ~0.345
        // miles.
        let nearest = index
            .nearest_boundary(Point::new(-87.63, 41.865), 0.8)
            .unwrap();
        assert!((nearest.distance_miles - 0.345).abs() < 1e-6);
    }

    #[test]
    fn picks_the_nearest_of_several_parks() {
        let index = BoundaryIndex::build(&[
            park(1, "NEAR", (-87.64, 41.87), (-87.62, 41.89)),
            park(2, "FAR", (-87.80, 41.95), (-87.78, 41.97)),
        ]);

        let nearest = index
            .nearest_boundary(Point::new(-87.63, 41.865), 0.8)
            .unwrap();
        assert_eq!(nearest.name, "NEAR");
    }

    #[test]
    fn far_points_are_rejected_by_the_prefilter_alone() {
        let index = BoundaryIndex::build(&[park(1, "A", (-87.64, 41.87), (-87.62, 41.89))]);

        // Tens of miles away: the expanded query box cannot intersect
        // the park's envelope, so no exact distance runs at all.
        let point = Point::new(-88.5, 42.5);
        assert_eq!(index.candidate_count(point, 0.8), 0);
        assert!(index.nearest_boundary(point, 0.8).is_none());
    }

    #[test]
    fn respects_the_max_distance_bound() {
        let index = BoundaryIndex::build(&[park(1, "A", (-87.64, 41.87), (-87.62, 41.89))]);

        // ~1.04 miles south of the southern edge; inside the query box
        // at 1.2 miles but outside at 0.8.
        let point = Point::new(-87.63, 41.855);
        assert!(index.nearest_boundary(point, 0.8).is_none());
        assert!(index.nearest_boundary(point, 1.2).is_some());
    }

    #[test]
    fn empty_index_returns_no_match() {
        let index = BoundaryIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.nearest_boundary(Point::new(-87.63, 41.87), 0.8).is_none());
    }
}
