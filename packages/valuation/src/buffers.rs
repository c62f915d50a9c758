//! Valuation buffer generation.
//!
//! One buffer per park at a fixed radius, tagged with the max-tier
//! premium. Only the maximum-impact zone is materialized as a polygon;
//! the finer premium tiers are handled analytically by the premium
//! model, trading visual complexity for computation cost.

use parkside_dataset_models::ParkFeature;
use parkside_geometry::buffer::buffer_outward_miles;
use parkside_valuation_models::ValuationBuffer;
use sha2::{Digest as _, Sha256};

use crate::premium::MAX_TIER_PREMIUM;

/// Fixed buffer radius in miles (the innermost premium tier).
pub const BUFFER_RADIUS_MILES: f64 = 0.2;

/// Presentation label for the single materialized zone.
pub const ZONE_LABEL: &str = "0-0.2 mi";

/// Generates the valuation buffer for one park.
///
/// Returns `None` when the park has no geometry, the geometry failed
/// ring validation upstream, or buffering produces nothing.
#[must_use]
pub fn generate(park: &ParkFeature) -> Option<ValuationBuffer> {
    let geometry = park.geometry.as_ref()?;
    let buffered = buffer_outward_miles(geometry, BUFFER_RADIUS_MILES)?;

    Some(ValuationBuffer {
        id: format!("park-{}-buffer", park.id),
        park_id: park.id,
        park_name: park.name.clone(),
        zone_label: ZONE_LABEL.to_string(),
        premium_pct: MAX_TIER_PREMIUM,
        geometry: buffered,
    })
}

/// The complete buffer collection for the current park set.
///
/// Can only be constructed by generating from parks, so downstream
/// consumers (coverage estimation, rendering) cannot run against
/// buffers that were never built. Rebuilt wholesale when the park set
/// changes.
pub struct BufferSet {
    buffers: Vec<ValuationBuffer>,
    fingerprint: String,
}

impl BufferSet {
    /// Generates buffers for every park, silently skipping parks whose
    /// geometry is missing or degenerate: a single malformed park must
    /// not abort the batch.
    #[must_use]
    pub fn build(parks: &[ParkFeature]) -> Self {
        let mut buffers = Vec::new();

        for park in parks {
            match generate(park) {
                Some(buffer) => buffers.push(buffer),
                None => log::debug!(
                    "No valuation buffer for park {} ({}): missing or degenerate geometry",
                    park.id,
                    park.name
                ),
            }
        }

        let fingerprint = fingerprint(&buffers);
        log::info!(
            "Generated {} valuation buffers from {} parks",
            buffers.len(),
            parks.len()
        );

        Self {
            buffers,
            fingerprint,
        }
    }

    /// The generated buffers.
    #[must_use]
    pub fn buffers(&self) -> &[ValuationBuffer] {
        &self.buffers
    }

    /// Number of buffers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether no park produced a buffer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Content fingerprint over the sorted buffer ids.
    ///
    /// Used in cache keys so a changed buffer set invalidates cached
    /// results even when the count is unchanged.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Hex SHA-256 over the sorted buffer ids, truncated for key brevity.
fn fingerprint(buffers: &[ValuationBuffer]) -> String {
    let mut ids: Vec<&str> = buffers.iter().map(|b| b.id.as_str()).collect();
    ids.sort_unstable();

    let mut hasher = Sha256::new();
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update([0u8]);
    }

    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(16);
    digest
}

#[cfg(test)]
mod tests {
    use geo::{Contains as _, LineString, MultiPolygon, Point, Polygon};

    use super::*;

    fn park(id: i64, min: (f64, f64), max: (f64, f64)) -> ParkFeature {
        ParkFeature {
            id,
            name: format!("PARK {id}"),
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

    #[test]
    fn generates_one_buffer_that_contains_the_park_footprint() {
        let park = park(12, (-87.64, 41.87), (-87.62, 41.89));
        let buffer = generate(&park).unwrap();

        assert_eq!(buffer.id, "park-12-buffer");
        assert!((buffer.premium_pct - 22.3).abs() < f64::EPSILON);

        let geometry = park.geometry.as_ref().unwrap();
        for polygon in geometry {
            for coord in polygon.exterior() {
                assert!(
                    buffer.geometry.contains(&Point::new(coord.x, coord.y)),
                    "park boundary point escaped its buffer"
                );
            }
        }
    }

    #[test]
    fn missing_geometry_generates_nothing() {
        let park = ParkFeature {
            id: 9,
            name: "NO GEOMETRY".to_string(),
            acreage: 0.0,
            geometry: None,
        };
        assert!(generate(&park).is_none());
    }

    #[test]
    fn batch_generation_skips_invalid_parks() {
        let parks = vec![
            park(1, (-87.64, 41.87), (-87.62, 41.89)),
            ParkFeature {
                id: 2,
                name: "NO GEOMETRY".to_string(),
                acreage: 0.0,
                geometry: None,
            },
            park(3, (-87.70, 41.90), (-87.68, 41.92)),
        ];

        let set = BufferSet::build(&parks);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn fingerprint_tracks_content_not_count() {
        let set_a = BufferSet::build(&[park(1, (-87.64, 41.87), (-87.62, 41.89))]);
        let set_b = BufferSet::build(&[park(2, (-87.64, 41.87), (-87.62, 41.89))]);

        assert_eq!(set_a.len(), set_b.len());
        assert_ne!(set_a.fingerprint(), set_b.fingerprint());
    }
}
