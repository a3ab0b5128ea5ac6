//! # Compact Hash Service
//!
//! Bijective mapping between a fixed set of `ModuleKey`s and the dense
//! indices `[0, N)`, assigned in ascending key order.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::data::{CompactIndex, ModuleKey};
use crate::error::{DomhashError, Result};

/// Perfect hash of module keys onto consecutive indices
///
/// Persisted as its key table only; the reverse map is rebuilt on load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "Vec<ModuleKey>", try_from = "Vec<ModuleKey>")]
pub struct CompactHashService {
    /// Index to key, ascending and fixed at construction
    keys: Vec<ModuleKey>,
    /// Key to index, built once from `keys`
    index_of: HashMap<ModuleKey, CompactIndex>,
}

impl CompactHashService {
    /// Hash a set of keys; index 0 goes to the smallest key
    pub fn new(keys: BTreeSet<ModuleKey>) -> Self {
        Self::from_sorted(keys.into_iter().collect())
    }

    /// Hash any collection of keys; duplicates collapse
    pub fn from_keys(keys: impl IntoIterator<Item = ModuleKey>) -> Self {
        Self::new(keys.into_iter().collect())
    }

    fn from_sorted(keys: Vec<ModuleKey>) -> Self {
        let index_of = keys
            .iter()
            .enumerate()
            .map(|(i, &key)| (key, CompactIndex::from(i)))
            .collect();
        tracing::debug!(n_keys = keys.len(), "built compact hash");
        Self { keys, index_of }
    }

    /// Index of `key`
    #[inline]
    pub fn index_of(&self, key: ModuleKey) -> Result<CompactIndex> {
        self.index_of
            .get(&key)
            .copied()
            .ok_or_else(|| DomhashError::unknown_key(key))
    }

    /// Key at `index`
    #[inline]
    pub fn key_of(&self, index: CompactIndex) -> Result<ModuleKey> {
        self.keys
            .get(index.as_usize())
            .copied()
            .ok_or_else(|| DomhashError::index_out_of_range(index, self.keys.len()))
    }

    pub fn contains(&self, key: ModuleKey) -> bool {
        self.index_of.contains_key(&key)
    }

    pub fn contains_index(&self, index: CompactIndex) -> bool {
        index.as_usize() < self.keys.len()
    }

    /// Number of hashed keys, N
    pub fn size(&self) -> usize {
        self.keys.len()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All keys in index order
    pub fn keys(&self) -> &[ModuleKey] {
        &self.keys
    }

    /// All keys as a set
    pub fn key_set(&self) -> BTreeSet<ModuleKey> {
        self.keys.iter().copied().collect()
    }

    /// Whether every key of `candidates` is hashed by this service.
    ///
    /// Covering is enough: the service may hash more keys than `candidates`.
    pub fn verify_against(&self, candidates: &BTreeSet<ModuleKey>) -> bool {
        match candidates.iter().find(|&&key| !self.contains(key)) {
            Some(key) => {
                tracing::warn!(%key, "key set holds modules this hasher does not encode");
                false
            }
            None => {
                tracing::debug!("key sets are congruent");
                true
            }
        }
    }
}

impl From<CompactHashService> for Vec<ModuleKey> {
    fn from(service: CompactHashService) -> Self {
        service.keys
    }
}

impl TryFrom<Vec<ModuleKey>> for CompactHashService {
    type Error = DomhashError;

    fn try_from(keys: Vec<ModuleKey>) -> Result<Self> {
        if keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DomhashError::invalid_data(
                "hash key table is not strictly ascending",
            ));
        }
        Ok(Self::from_sorted(keys))
    }
}
