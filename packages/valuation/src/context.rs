//! Top-level analysis context.
//!
//! Owns the cache store and the derived state (buffer set, boundary
//! index) so there is no module-level mutable state anywhere in the
//! core. Both derived structures are rebuilt wholesale from a new park
//! set; `invalidate` drops them explicitly instead of comparing counts
//! behind the caller's back.

use geo::Point;
use parkside_cache::CacheStore;
use parkside_dataset_models::{CommunityArea, ParkFeature};
use parkside_spatial::BoundaryIndex;
use parkside_valuation_models::{CoverageReport, ParcelReport};

use crate::buffers::BufferSet;
use crate::{ValuationError, coverage, parcel};

/// Orchestrates the analysis pipeline over one park dataset.
///
/// Querying before [`AnalysisContext::load_parks`] is a programmer
/// error and returns [`ValuationError`]; data-quality problems inside a
/// query never do.
pub struct AnalysisContext {
    cache: CacheStore,
    buffers: Option<BufferSet>,
    index: Option<BoundaryIndex>,
}

impl AnalysisContext {
    /// Creates a context with no derived state yet.
    #[must_use]
    pub const fn new(cache: CacheStore) -> Self {
        Self {
            cache,
            buffers: None,
            index: None,
        }
    }

    /// Rebuilds the buffer set and the boundary index from a park set.
    ///
    /// Always a wholesale rebuild; there is no incremental update path.
    pub fn load_parks(&mut self, parks: &[ParkFeature]) {
        self.buffers = Some(BufferSet::build(parks));
        self.index = Some(BoundaryIndex::build(parks));
    }

    /// Drops the derived state until the next [`Self::load_parks`].
    pub fn invalidate(&mut self) {
        self.buffers = None;
        self.index = None;
    }

    /// The underlying cache store.
    #[must_use]
    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// The generated buffer set, for rendering overlays.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::BuffersNotBuilt`] before `load_parks`.
    pub fn buffers(&self) -> Result<&BufferSet, ValuationError> {
        self.buffers.as_ref().ok_or(ValuationError::BuffersNotBuilt)
    }

    /// Coverage estimate for one community area.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::BuffersNotBuilt`] before `load_parks`.
    pub fn area_coverage(&self, area: &CommunityArea) -> Result<CoverageReport, ValuationError> {
        Ok(coverage::analyze(area, self.buffers()?, &self.cache))
    }

    /// Parcel evaluation for one point.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::IndexNotBuilt`] before `load_parks`.
    pub fn evaluate_parcel(&self, point: Point<f64>) -> Result<ParcelReport, ValuationError> {
        Ok(parcel::evaluate(point, self.index()?))
    }

    /// Hover query: distance in miles to the nearest park boundary, or
    /// `None` when nothing is within `max_miles`.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::IndexNotBuilt`] before `load_parks`.
    pub fn boundary_distance(
        &self,
        point: Point<f64>,
        max_miles: f64,
    ) -> Result<Option<f64>, ValuationError> {
        Ok(self
            .index()?
            .nearest_boundary(point, max_miles)
            .map(|nearest| nearest.distance_miles))
    }

    fn index(&self) -> Result<&BoundaryIndex, ValuationError> {
        self.index.as_ref().ok_or(ValuationError::IndexNotBuilt)
    }
}
