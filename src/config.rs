//! # Configuration
//!
//! ## Role
//! Construction options for `HashedGeometry`. There is no command line; the
//! struct is deserializable so a host application can embed it in its own
//! configuration file.
//!
//! ## Fields
//! - `prewarm_distances: bool` - compute every pairwise distance up front
//!   (default: false, distances are computed on first use)
//! - `verify_on_build: bool` - reject snapshots holding a NaN or infinite
//!   coordinate for a hashed module (default: true)

use serde::{Deserialize, Serialize};

/// Options for building a `HashedGeometry`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashedGeometryConfig {
    /// Run `hash_all_distances` after construction
    pub prewarm_distances: bool,
    /// Fail construction on non-finite module positions
    pub verify_on_build: bool,
}

impl Default for HashedGeometryConfig {
    fn default() -> Self {
        Self {
            prewarm_distances: false,
            verify_on_build: true,
        }
    }
}
