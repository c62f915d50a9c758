//! Per-point parcel valuation.
//!
//! The click-popup flow: find the nearest park edge, decide whether the
//! point is in the valuation zone, and simulate a before/after value.
//! Unlike the hover flow's interpolated premium model, this flow
//! applies only the max-tier threshold; the two rules are intentionally
//! kept distinct.

use geo::Point;
use parkside_spatial::BoundaryIndex;
use parkside_valuation_models::{NearestAsset, ParcelReport, Valuation};

use crate::buffers::BUFFER_RADIUS_MILES;
use crate::premium::MAX_TIER_PREMIUM;

/// Valuation-zone cutoff in miles, matching the lowest non-zero tier of
/// the premium table.
pub const VALUATION_ZONE_MILES: f64 = 0.8;

/// Nominal base value for the simulated valuation, in dollars.
pub const BASE_VALUE: f64 = 350_000.0;

/// Evaluates a single point against the boundary index.
///
/// A point with no park edge within the zone cutoff reports
/// `in_valuation_zone: false` with no further fields; anything else is
/// synchronous and failure-free given valid geometry.
#[must_use]
pub fn evaluate(point: Point<f64>, index: &BoundaryIndex) -> ParcelReport {
    let Some(nearest) = index.nearest_boundary(point, VALUATION_ZONE_MILES) else {
        return ParcelReport {
            in_valuation_zone: false,
            nearest: None,
            valuation: None,
        };
    };

    let premium_pct = if nearest.distance_miles <= BUFFER_RADIUS_MILES {
        MAX_TIER_PREMIUM
    } else {
        0.0
    };
    let valuated_value = BASE_VALUE * (1.0 + premium_pct / 100.0);

    ParcelReport {
        in_valuation_zone: true,
        nearest: Some(NearestAsset {
            name: nearest.name,
            distance_miles: nearest.distance_miles,
        }),
        valuation: Some(Valuation {
            premium_pct,
            base_value: BASE_VALUE,
            valuated_value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiPolygon, Polygon};
    use parkside_dataset_models::ParkFeature;

    use super::*;

    fn index() -> BoundaryIndex {
        let park = ParkFeature {
            id: 1,
            name: "GRANT".to_string(),
            acreage: 300.0,
            geometry: Some(MultiPolygon(vec![Polygon::new(
                LineString::from(vec![
                    (-87.64, 41.87),
                    (-87.62, 41.87),
                    (-87.62, 41.89),
                    (-87.64, 41.89),
                    (-87.64, 41.87),
                ]),
                vec![],
            )])),
        };
        BoundaryIndex::build(&[park])
    }

    #[test]
    fn point_at_the_park_boundary_gets_the_max_tier_premium() {
        let report = evaluate(Point::new(-87.63, 41.87), &index());

        assert!(report.in_valuation_zone);
        let nearest = report.nearest.unwrap();
        assert_eq!(nearest.name, "GRANT");
        assert!(nearest.distance_miles < 1e-9);

        let valuation = report.valuation.unwrap();
        assert!((valuation.premium_pct - 22.3).abs() < 1e-9);
        assert!((valuation.valuated_value - BASE_VALUE * 1.223).abs() < 1e-6);
    }

    #[test]
    fn point_a_mile_away_is_out_of_zone() {
        // ~1.04 miles south of the southern edge.
        let report = evaluate(Point::new(-87.63, 41.855), &index());

        assert!(!report.in_valuation_zone);
        assert_eq!(report.nearest, None);
        assert_eq!(report.valuation, None);
    }

    #[test]
    fn mid_zone_point_is_in_zone_with_zero_premium() {
        // ~0.35 miles from the southern edge: inside the 0.8-mile zone,
        // outside the 0.2-mile max tier.
        let report = evaluate(Point::new(-87.63, 41.865), &index());

        assert!(report.in_valuation_zone);
        let valuation = report.valuation.unwrap();
        assert!((valuation.premium_pct - 0.0).abs() < f64::EPSILON);
        assert!((valuation.valuated_value - BASE_VALUE).abs() < 1e-6);
    }
}
