#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometric valuation core.
//!
//! Derives proximity-based real-estate valuation figures from the park
//! and community area datasets: per-park valuation buffers, a
//! distance-to-premium model, sampling-based area coverage estimates,
//! and per-point parcel evaluations. Exact computational geometry is
//! deliberately traded for bounded-latency approximations; every
//! data-quality problem degrades to a defined fallback value instead
//! of an error.

pub mod buffers;
pub mod context;
pub mod coverage;
pub mod parcel;
pub mod premium;

use thiserror::Error;

/// Programmer errors: an analysis stage was queried before the stage it
/// depends on ran. Data-quality problems never produce these.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// Valuation buffers have not been generated yet.
    #[error("valuation buffers have not been generated; load parks first")]
    BuffersNotBuilt,

    /// The boundary index has not been built yet.
    #[error("boundary index has not been built; load parks first")]
    IndexNotBuilt,
}
