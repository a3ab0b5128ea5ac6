//! # Position Service
//!
//! Per-index cache of module positions, filled once from a geometry snapshot
//! through a shared `CompactHashService`.

use std::sync::Arc;

use crate::data::{CompactIndex, ModuleKey, OmGeoMap, Position, extract_keys};
use crate::error::{DomhashError, Result};
use crate::services::hash::CompactHashService;

/// Hashed module positions
#[derive(Clone, Debug)]
pub struct PositionService {
    /// Shared with sibling services so indices agree
    hasher: Arc<CompactHashService>,
    /// position[i] is the position of `hasher.key_of(i)`
    positions: Vec<Position>,
}

impl PositionService {
    /// Cache the position of every hashed key.
    ///
    /// Fails with `MissingGeometry` if the snapshot lacks a hashed key; no
    /// partially filled service is ever returned.
    pub fn new(geometry: &OmGeoMap, hasher: Arc<CompactHashService>) -> Result<Self> {
        let positions = hasher
            .keys()
            .iter()
            .map(|&key| {
                geometry
                    .get(&key)
                    .map(|geo| geo.position)
                    .ok_or_else(|| DomhashError::missing_geometry(key))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(n_positions = positions.len(), "hashed module positions");
        Ok(Self { hasher, positions })
    }

    /// Build from a snapshot, creating the hasher if the caller has none.
    ///
    /// When `hasher` is `None` a hash service over every key of `geometry` is
    /// built and written back, so sibling services can share it.
    pub fn from_geometry(
        geometry: &OmGeoMap,
        hasher: &mut Option<Arc<CompactHashService>>,
    ) -> Result<Self> {
        let hasher = hasher
            .get_or_insert_with(|| Arc::new(CompactHashService::new(extract_keys(geometry))))
            .clone();
        Self::new(geometry, hasher)
    }

    /// Reassemble from a hasher and an already hashed position table
    pub(crate) fn from_parts(
        hasher: Arc<CompactHashService>,
        positions: Vec<Position>,
    ) -> Result<Self> {
        if positions.len() != hasher.size() {
            return Err(DomhashError::invalid_data(format!(
                "{} positions for {} hashed keys",
                positions.len(),
                hasher.size()
            )));
        }
        Ok(Self { hasher, positions })
    }

    /// Position of a hashed index; panics if `index` is out of range
    #[inline]
    pub fn position(&self, index: CompactIndex) -> &Position {
        &self.positions[index.as_usize()]
    }

    /// Position of a hashed key
    pub fn position_of(&self, key: ModuleKey) -> Result<&Position> {
        Ok(self.position(self.hasher.index_of(key)?))
    }

    /// All positions in index order
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn hash_service(&self) -> &Arc<CompactHashService> {
        &self.hasher
    }

    /// First hashed key whose position has a NaN or infinite component
    pub fn first_non_finite(&self) -> Option<ModuleKey> {
        self.hasher
            .keys()
            .iter()
            .zip(&self.positions)
            .find(|(_, position)| !position.is_finite())
            .map(|(&key, _)| key)
    }

    /// Whether every cached position still matches `geometry` exactly
    pub fn verify_against(&self, geometry: &OmGeoMap) -> bool {
        for (&key, cached) in self.hasher.keys().iter().zip(&self.positions) {
            match geometry.get(&key) {
                None => {
                    tracing::warn!(%key, "hashed module missing from geometry");
                    return false;
                }
                Some(geo) if geo.position != *cached => {
                    tracing::warn!(%key, "module position drifted from hashed value");
                    return false;
                }
                Some(_) => {}
            }
        }
        true
    }
}
