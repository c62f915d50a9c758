#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Open data fetching, normalization, and cache write-through.
//!
//! Downloads community area, park, and waterway polygons from the
//! city's Socrata portal, normalizes them into typed records, and
//! caches the raw feature arrays so repeated runs stay off the network.
//! Sources are defined as a TOML file embedded at compile time.

pub mod fetchers;
pub mod load;
pub mod normalize;
pub mod registry;

use thiserror::Error;

/// Errors that can occur while fetching or normalizing datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
