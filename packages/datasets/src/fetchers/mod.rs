//! Fetchers for the city's open data APIs.

pub mod socrata_geo;
