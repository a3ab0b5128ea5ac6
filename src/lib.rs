//! # domhash
//!
//! Compact hashing of optical-module keys and cached per-module and
//! pairwise geometry services for the IceCube detector.
//!
//! ## Modules
//! - `config`: Construction options for `HashedGeometry`
//! - `data`: Module keys, positions, geometry snapshots, index matrices
//! - `error`: Error types and result aliases
//! - `io`: Saving and loading a hashed geometry with its distance cache
//! - `services`: Hash, position and distance services

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod services;

// Re-export commonly used types
pub use config::HashedGeometryConfig;
pub use data::{
    extract_keys, AsymmetricIndexMatrix, CompactIndex, IndexMatrix, ModuleKey, OmGeo, OmGeoMap,
    OmType, Position, SymmetricIndexMatrix,
};
pub use error::{DomhashError, Result};
pub use io::{HashedGeometryReader, HashedGeometryWriter};
pub use services::{CompactHashService, DistanceService, HashedGeometry, PositionService};
