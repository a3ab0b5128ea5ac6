//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.
//!
//! Every variant marks a caller-side consistency bug (unknown key, index past
//! the hash range, geometry that does not match the hasher). There is no
//! transient category: nothing here is worth retrying. File I/O lives in
//! `io::binary` and reports through `anyhow`.

use thiserror::Error;

use crate::data::{CompactIndex, ModuleKey};

/// Main error type for domhash operations
#[derive(Error, Debug)]
pub enum DomhashError {
    /// Lookup of a key the hash service was not built with
    #[error("{key} is not hashed by this service")]
    UnknownKey { key: ModuleKey },

    /// Lookup of an index past the end of the hash table
    #[error("compact index {index} is out of range (hash size {size})")]
    IndexOutOfRange { index: CompactIndex, size: usize },

    /// The geometry snapshot lacks a key the hash service expects
    #[error("{key} is hashed but missing from the geometry")]
    MissingGeometry { key: ModuleKey },

    /// Invalid data errors (malformed persisted state, failed verification)
    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

/// Type alias for Results using DomhashError
pub type Result<T> = std::result::Result<T, DomhashError>;

impl DomhashError {
    /// Create an unknown key error
    pub fn unknown_key(key: ModuleKey) -> Self {
        Self::UnknownKey { key }
    }

    /// Create an out-of-range error
    pub fn index_out_of_range(index: CompactIndex, size: usize) -> Self {
        Self::IndexOutOfRange { index, size }
    }

    /// Create a missing geometry error
    pub fn missing_geometry(key: ModuleKey) -> Self {
        Self::MissingGeometry { key }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}
