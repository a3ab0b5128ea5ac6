//! # Geometry Snapshot
//!
//! The read-only module geometry handed in by the surrounding framework:
//! one `OmGeo` record per `ModuleKey`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::{ModuleKey, Position};

/// Photocathode area of a standard module (m²)
pub const DEFAULT_OM_AREA: f64 = 0.0443999990821;

/// Kind of optical module
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OmType {
    /// Module frozen into the ice
    #[default]
    InIce,
    /// Surface tank module
    IceTop,
}

/// Geometry record of a single module
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OmGeo {
    pub position: Position,
    pub om_type: OmType,
    pub area: f64,
}

impl OmGeo {
    /// In-ice module of standard area at `position`
    pub fn new(position: Position) -> Self {
        Self {
            position,
            om_type: OmType::InIce,
            area: DEFAULT_OM_AREA,
        }
    }

    pub fn with_type(mut self, om_type: OmType) -> Self {
        self.om_type = om_type;
        self
    }
}

/// Geometry snapshot: module key to geometry record
pub type OmGeoMap = BTreeMap<ModuleKey, OmGeo>;

/// Collect the keys of any module-keyed map (geometry, pulse series, ...)
pub fn extract_keys<V>(map: &BTreeMap<ModuleKey, V>) -> BTreeSet<ModuleKey> {
    map.keys().copied().collect()
}
