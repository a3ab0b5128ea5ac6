//! # Hashed Geometry
//!
//! One-stop construction of the three services over a shared hash.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::HashedGeometryConfig;
use crate::data::{extract_keys, ModuleKey, OmGeoMap};
use crate::error::{DomhashError, Result};
use crate::services::distance::DistanceService;
use crate::services::hash::CompactHashService;
use crate::services::position::PositionService;

/// Hash, position and distance services built from one geometry snapshot
#[derive(Clone, Debug)]
pub struct HashedGeometry {
    hasher: Arc<CompactHashService>,
    positions: Arc<PositionService>,
    distances: Arc<DistanceService>,
}

impl HashedGeometry {
    /// Hash every module of `geometry`
    pub fn new(geometry: &OmGeoMap) -> Result<Self> {
        Self::with_keys(geometry, extract_keys(geometry))
    }

    /// Hash only `keys`; each must be present in `geometry`
    pub fn with_keys(geometry: &OmGeoMap, keys: BTreeSet<ModuleKey>) -> Result<Self> {
        let hasher = Arc::new(CompactHashService::new(keys));
        let positions = Arc::new(PositionService::new(geometry, hasher)?);
        Ok(Self::from_position_service(positions))
    }

    /// Build around an existing position service and its hasher
    pub fn from_position_service(positions: Arc<PositionService>) -> Self {
        let distances = Arc::new(DistanceService::new(Arc::clone(&positions)));
        Self::from_services(positions, distances)
    }

    pub(crate) fn from_services(
        positions: Arc<PositionService>,
        distances: Arc<DistanceService>,
    ) -> Self {
        Self {
            hasher: Arc::clone(positions.hash_service()),
            positions,
            distances,
        }
    }

    /// Build over every module of `geometry` with explicit options
    pub fn with_config(geometry: &OmGeoMap, config: &HashedGeometryConfig) -> Result<Self> {
        let hashed = Self::new(geometry)?;

        // a NaN coordinate would quantize every distance to it as 0
        if config.verify_on_build {
            if let Some(key) = hashed.positions.first_non_finite() {
                return Err(DomhashError::invalid_data(format!(
                    "{key} has a non-finite position"
                )));
            }
        }
        if config.prewarm_distances {
            hashed.distances.hash_all_distances();
        }
        Ok(hashed)
    }

    /// Whether the hashed positions still match `geometry`
    pub fn verify_against(&self, geometry: &OmGeoMap) -> bool {
        self.distances.verify_against(geometry)
    }

    pub fn hash_service(&self) -> &Arc<CompactHashService> {
        &self.hasher
    }

    pub fn position_service(&self) -> &Arc<PositionService> {
        &self.positions
    }

    pub fn distance_service(&self) -> &Arc<DistanceService> {
        &self.distances
    }
}
