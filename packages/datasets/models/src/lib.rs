#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset record types and source definition schema.
//!
//! Defines the TOML schema for the city's open data endpoints and the
//! normalized record types produced after fetching and parsing. Records
//! keep their geometry optional: a feature with missing or malformed
//! geometry is still a valid record, it just cannot participate in
//! geometric analysis.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// A named administrative subdivision of the city.
///
/// The stable `area_code` is the identity used for selection state and
/// cache keys; the polygon is never mutated after creation.
#[derive(Debug, Clone)]
pub struct CommunityArea {
    /// Stable area code, unique across the dataset.
    pub area_code: String,
    /// Display name (e.g., "LINCOLN PARK").
    pub name: String,
    /// Area polygon; absent when the source record is malformed.
    pub geometry: Option<MultiPolygon<f64>>,
}

/// A park polygon from the park district dataset.
#[derive(Debug, Clone)]
pub struct ParkFeature {
    /// Numeric park id.
    pub id: i64,
    /// Park name.
    pub name: String,
    /// Park acreage; 0 when absent from the source record.
    pub acreage: f64,
    /// Park polygon; absent when the source record is malformed.
    pub geometry: Option<MultiPolygon<f64>>,
}

/// A waterway polygon, fetched for map overlays.
#[derive(Debug, Clone)]
pub struct Waterway {
    /// Numeric feature id.
    pub id: i64,
    /// Waterway name.
    pub name: String,
    /// Waterway polygon; absent when the source record is malformed.
    pub geometry: Option<MultiPolygon<f64>>,
}

/// A property record resolved for a queried point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Parcel identification number.
    pub pin: String,
    /// Street address.
    pub address: String,
}

/// The full set of dataset sources for one city, deserialized from
/// TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Community area boundaries endpoint.
    pub community_areas: AreaSourceConfig,
    /// Park boundaries endpoint.
    pub parks: ParkSourceConfig,
    /// Waterway boundaries endpoint.
    pub waterways: WaterwaySourceConfig,
    /// Property record point-lookup endpoint.
    pub property: PropertySourceConfig,
}

/// Socrata `GeoJSON` endpoint for community areas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaSourceConfig {
    /// `resource.geojson` URL.
    pub url: String,
    /// Page size override (default: 1000).
    pub limit: Option<u32>,
    /// Property field containing the stable area code.
    pub code_field: String,
    /// Property field containing the display name.
    pub name_field: String,
}

/// Socrata `GeoJSON` endpoint for park boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkSourceConfig {
    /// `resource.geojson` URL.
    pub url: String,
    /// Page size override (default: 1000).
    pub limit: Option<u32>,
    /// Property field containing the numeric park id.
    pub id_field: String,
    /// Property field containing the park name.
    pub name_field: String,
    /// Property field containing the acreage.
    pub acreage_field: String,
}

/// Socrata `GeoJSON` endpoint for waterways.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterwaySourceConfig {
    /// `resource.geojson` URL.
    pub url: String,
    /// Page size override (default: 1000).
    pub limit: Option<u32>,
    /// Property field containing the numeric feature id.
    pub id_field: String,
    /// Property field containing the waterway name.
    pub name_field: String,
}

/// Socrata JSON endpoint for property records, queried by point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySourceConfig {
    /// `resource.json` URL.
    pub url: String,
    /// Field containing the parcel identification number.
    pub pin_field: String,
    /// Field containing the street address.
    pub address_field: String,
    /// Point-typed field used for `within_circle` queries.
    pub location_field: String,
}
