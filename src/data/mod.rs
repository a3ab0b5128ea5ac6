//! # Data Module
//!
//! Value types shared by the services, and the index matrices they cache into.
//!
//! ## Design Philosophy
//! - **Zero-cost newtypes:** `CompactIndex` keeps dense hash indices apart
//!   from raw `usize` matrix coordinates at API boundaries.
//! - **Plain snapshots:** the geometry handed in by the framework is an
//!   ordered map, so key sets come out sorted for free.

pub mod geometry;
pub mod ic86;
pub mod module_key;
pub mod position;
pub mod storage;

// Re-export commonly used types
pub use geometry::{extract_keys, OmGeo, OmGeoMap, OmType};
pub use module_key::{CompactIndex, ModuleKey};
pub use position::Position;
pub use storage::{AsymmetricIndexMatrix, IndexMatrix, SymmetricIndexMatrix};
