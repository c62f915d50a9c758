#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry primitives adapter for the valuation core.
//!
//! Wraps the `geo`/`geojson`/`geo-buffer`/`rstar` stack behind the
//! small set of operations the analysis pipeline needs: validated
//! `GeoJSON` parsing, bounding boxes, outward polygon buffering,
//! mile/degree conversions with the city-scale planar approximation,
//! and point-grid sampling.
//!
//! Everything here is lon/lat (WGS84 degrees) unless a name says miles.

pub mod bbox;
pub mod buffer;
pub mod grid;
pub mod parse;
pub mod units;
