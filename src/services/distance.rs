//! # Distance Service
//!
//! Lazily memoized pairwise module distances.
//!
//! ## Storage
//! Distances live in a `SymmetricIndexMatrix<u16>` rounded to whole meters
//! (`+0.5`, truncate): at most 0.5 m error, N(N+1)/2 × 2 bytes of memory.
//! Slot value 0 means "not computed yet"; a module's distance to itself is
//! answered without touching the cache.
//!
//! ## Concurrency
//! The cache sits behind an `RwLock` so the service can be queried through
//! `&self` from several threads. Hits take the read lock. Misses compute the
//! distance without holding a lock and then store it under the write lock;
//! racing writers store the same value. The cache only ever fills up, it is
//! never invalidated.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rayon::prelude::*;

use crate::data::{CompactIndex, ModuleKey, OmGeoMap, SymmetricIndexMatrix};
use crate::error::{DomhashError, Result};
use crate::services::hash::CompactHashService;
use crate::services::position::PositionService;

/// Round a distance to whole meters for the cache.
///
/// Saturates at `u16::MAX` (~65 km), far beyond any detector extent.
#[inline]
fn quantize(distance: f64) -> u16 {
    let rounded = distance + 0.5;
    if rounded >= u16::MAX as f64 + 1.0 {
        tracing::warn!(distance, "distance exceeds cache range, saturating");
        return u16::MAX;
    }
    rounded as u16
}

/// Hashed, lazily populated module-to-module distances
#[derive(Debug)]
pub struct DistanceService {
    hasher: Arc<CompactHashService>,
    positions: Arc<PositionService>,
    /// Quantized distances in meters, 0 = not computed
    cache: RwLock<SymmetricIndexMatrix<u16>>,
}

impl DistanceService {
    /// Wrap a position service with an empty cache
    pub fn new(positions: Arc<PositionService>) -> Self {
        let hasher = Arc::clone(positions.hash_service());
        let cache = SymmetricIndexMatrix::new(hasher.size());
        Self {
            hasher,
            positions,
            cache: RwLock::new(cache),
        }
    }

    /// Reassemble with a previously populated cache
    pub(crate) fn with_cache(
        positions: Arc<PositionService>,
        cache: SymmetricIndexMatrix<u16>,
    ) -> Result<Self> {
        let hasher = Arc::clone(positions.hash_service());
        if cache.bi_size() != hasher.size() {
            return Err(DomhashError::invalid_data(format!(
                "distance cache of size {} for {} hashed keys",
                cache.bi_size(),
                hasher.size()
            )));
        }
        Ok(Self {
            hasher,
            positions,
            cache: RwLock::new(cache),
        })
    }

    // A panic while holding the lock cannot leave a slot half-written, so a
    // poisoned cache is still valid.
    fn read_cache(&self) -> RwLockReadGuard<'_, SymmetricIndexMatrix<u16>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, SymmetricIndexMatrix<u16>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Distance between two hashed modules in meters (±0.5 m)
    pub fn distance(&self, a: CompactIndex, b: CompactIndex) -> f64 {
        if a == b {
            return 0.0;
        }
        let (ia, ib) = (a.as_usize(), b.as_usize());

        let cached = self.read_cache().get(ia, ib);
        if cached != 0 {
            return cached as f64;
        }

        let dist = quantize(self.positions.position(a).distance(self.positions.position(b)));
        self.write_cache().set(ia, ib, dist);
        dist as f64
    }

    /// Distance between two modules by key
    pub fn distance_of(&self, a: ModuleKey, b: ModuleKey) -> Result<f64> {
        Ok(self.distance(self.hasher.index_of(a)?, self.hasher.index_of(b)?))
    }

    /// Compute every pairwise distance up front.
    ///
    /// Rows are computed in parallel, then written into the cache under one
    /// write lock.
    pub fn hash_all_distances(&self) {
        let n = self.hasher.size();
        let _span = tracing::info_span!("hash_all_distances", n_modules = n).entered();

        let positions = self.positions.positions();
        let rows: Vec<Vec<u16>> = (0..n)
            .into_par_iter()
            .map(|a| {
                (0..=a)
                    .map(|b| quantize(positions[a].distance(&positions[b])))
                    .collect()
            })
            .collect();

        let mut cache = self.write_cache();
        for (a, row) in rows.iter().enumerate() {
            for (b, &dist) in row.iter().enumerate() {
                cache.set(a, b, dist);
            }
        }
    }

    /// Number of distinct module pairs with a cached distance
    pub fn cached_count(&self) -> usize {
        self.read_cache()
            .iter()
            .filter(|&((a, b), dist)| a != b && dist != 0)
            .count()
    }

    /// Copy of the current cache contents
    pub(crate) fn cache_snapshot(&self) -> SymmetricIndexMatrix<u16> {
        self.read_cache().clone()
    }

    /// Whether the underlying positions still match `geometry`
    pub fn verify_against(&self, geometry: &OmGeoMap) -> bool {
        self.positions.verify_against(geometry)
    }

    pub fn hash_service(&self) -> &Arc<CompactHashService> {
        &self.hasher
    }

    pub fn position_service(&self) -> &Arc<PositionService> {
        &self.positions
    }
}
