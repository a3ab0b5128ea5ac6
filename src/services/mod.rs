//! # Services
//!
//! ## Role
//! Cached views of a detector geometry, all indexed by one shared
//! `CompactHashService`:
//!
//! - `hash`: module key <-> dense index
//! - `position`: index -> position
//! - `distance`: (index, index) -> distance, memoized on first use
//! - `hashed_geometry`: builds all three in one call
//!
//! The hash and position services are immutable once built. The distance
//! service fills its cache through `&self`, so every service can be shared
//! across threads behind an `Arc`.

pub mod distance;
pub mod hash;
pub mod hashed_geometry;
pub mod position;

pub use distance::DistanceService;
pub use hash::CompactHashService;
pub use hashed_geometry::HashedGeometry;
pub use position::PositionService;
