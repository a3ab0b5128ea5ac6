//! # I/O Module
//!
//! On-disk form of a `HashedGeometry`, for starting without the geometry
//! snapshot.

pub mod binary;

pub use binary::{HashedGeometryReader, HashedGeometryWriter};
