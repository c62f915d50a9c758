#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived valuation entity and result types.
//!
//! Result types serialize with the field names the presentation layer
//! (and the persisted cache format) expects; percentages serialize as
//! one-decimal strings.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// A buffered valuation zone derived from one park.
///
/// Identity is `park-<id>-buffer`. Created once per park, in bulk,
/// after the park dataset loads; regenerated whenever the park set
/// changes and never mutated in place.
#[derive(Debug, Clone)]
pub struct ValuationBuffer {
    /// Derived identity, `park-<id>-buffer`.
    pub id: String,
    /// Source park id.
    pub park_id: i64,
    /// Source park name.
    pub park_name: String,
    /// Distance-zone label for presentation (e.g., "0-0.2 mi").
    pub zone_label: String,
    /// Premium percentage attached to this zone.
    pub premium_pct: f64,
    /// The park polygon expanded outward by the zone radius.
    pub geometry: MultiPolygon<f64>,
}

/// Area coverage estimate for one community area.
///
/// `inside_pct + outside_pct == 100.0` exactly: the outside share is
/// computed as the complement of the rounded inside share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Share of the area's surface inside any valuation buffer, percent.
    #[serde(rename = "insidePercentage", with = "pct_string")]
    pub inside_pct: f64,
    /// Complement of `inside_pct`, percent.
    #[serde(rename = "outsidePercentage", with = "pct_string")]
    pub outside_pct: f64,
    /// Area-weighted average premium, percent.
    #[serde(rename = "averagePremium", with = "pct_string")]
    pub average_premium: f64,
}

impl CoverageReport {
    /// The defined fallback for degenerate inputs and zero coverage:
    /// nothing inside, no premium. Always displayable, never an error.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            inside_pct: 0.0,
            outside_pct: 100.0,
            average_premium: 0.0,
        }
    }
}

/// The nearest park found for a parcel query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestAsset {
    /// Park name.
    pub name: String,
    /// Distance from the queried point to the park edge, in miles.
    #[serde(rename = "distanceMiles")]
    pub distance_miles: f64,
}

/// Simulated before/after valuation for a parcel query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Premium percentage applied.
    #[serde(rename = "premium")]
    pub premium_pct: f64,
    /// Nominal base value before the premium.
    #[serde(rename = "baseValue")]
    pub base_value: f64,
    /// `base_value * (1 + premium / 100)`.
    #[serde(rename = "valuatedValue")]
    pub valuated_value: f64,
}

/// Result of evaluating a single queried point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelReport {
    /// Whether the point falls inside the valuation zone cutoff.
    #[serde(rename = "isInValuationZone")]
    pub in_valuation_zone: bool,
    /// Nearest park, absent when out of zone.
    #[serde(rename = "nearestAsset")]
    pub nearest: Option<NearestAsset>,
    /// Simulated valuation, absent when out of zone.
    pub valuation: Option<Valuation>,
}

/// Serializes percentages as one-decimal strings (`"42.3"`), the format
/// the presentation layer and the persisted cache entries use.
mod pct_string {
    use serde::{Deserialize as _, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:.1}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_report_serializes_percentages_as_strings() {
        let report = CoverageReport {
            inside_pct: 42.3,
            outside_pct: 57.7,
            average_premium: 9.4,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["insidePercentage"], "42.3");
        assert_eq!(json["outsidePercentage"], "57.7");
        assert_eq!(json["averagePremium"], "9.4");

        let back: CoverageReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn fallback_is_all_outside() {
        let fallback = CoverageReport::fallback();
        assert!((fallback.inside_pct - 0.0).abs() < f64::EPSILON);
        assert!((fallback.outside_pct - 100.0).abs() < f64::EPSILON);
    }
}
