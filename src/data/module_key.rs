//! # Module Key and Compact Index Definitions
//!
//! `ModuleKey` identifies an optical module by (string, om). `CompactIndex` is
//! the dense alias a hash service assigns to it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Composite identifier of an optical module
///
/// Ordering is lexicographic on (string, om), so a sorted key set walks the
/// detector string by string.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct ModuleKey {
    string: u16,
    om: u16,
}

impl ModuleKey {
    pub const fn new(string: u16, om: u16) -> Self {
        Self { string, om }
    }

    /// String (cable) number
    pub fn string(self) -> u16 {
        self.string
    }

    /// Module number along the string
    pub fn om(self) -> u16 {
        self.om
    }
}

impl From<(u16, u16)> for ModuleKey {
    fn from((string, om): (u16, u16)) -> Self {
        Self::new(string, om)
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OMKey({},{})", self.string, self.om)
    }
}

/// Zero-cost newtype for dense hash indices
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CompactIndex(pub u32);

impl CompactIndex {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for CompactIndex {
    fn from(idx: u32) -> Self {
        Self(idx)
    }
}

impl From<usize> for CompactIndex {
    fn from(idx: usize) -> Self {
        debug_assert!(idx <= u32::MAX as usize, "compact index {idx} overflows u32");
        Self(idx as u32)
    }
}

impl From<CompactIndex> for usize {
    fn from(idx: CompactIndex) -> usize {
        idx.0 as usize
    }
}

impl fmt::Display for CompactIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
