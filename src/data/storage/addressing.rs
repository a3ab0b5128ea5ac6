//! # Addressing Policies
//!
//! Zero-sized marker types that map a 2-D index pair onto the flat backing
//! store of an `IndexMatrix`, chosen at compile time.
//!
//! # Example
//!
//! ```ignore
//! // full N x N grid, (a, b) and (b, a) are independent slots
//! let asym: IndexMatrix<f64, Asymmetric> = IndexMatrix::new(n);
//!
//! // packed lower triangle, (a, b) and (b, a) share one slot
//! let sym: IndexMatrix<f64, Symmetric> = IndexMatrix::new(n);
//! ```

use std::fmt::Debug;

/// Marker trait for addressing policies.
///
/// This trait is sealed and cannot be implemented outside this module,
/// ensuring only `Symmetric` and `Asymmetric` can be used as policies.
pub trait Addressing: Copy + Clone + Default + Debug + Send + Sync + private::Sealed {
    /// Whether (a, b) and (b, a) address the same slot
    const IS_SYMMETRIC: bool;

    /// Number of physical slots needed for an index range of `bi_size`
    fn capacity(bi_size: usize) -> usize;

    /// Linear slot of (a, b)
    fn to_linear(bi_size: usize, a: usize, b: usize) -> usize;

    /// Inverse of `to_linear`: the canonical index pair of a linear slot
    fn from_linear(bi_size: usize, index: usize) -> (usize, usize);
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Symmetric {}
    impl Sealed for super::Asymmetric {}
}

/// Number of slots in the packed lower triangle of rows `0..n`
#[inline(always)]
pub const fn triangular(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Packed lower-triangular layout, diagonal included.
///
/// Row `a` starts at `triangular(a)` and holds columns `0..=a`. The canonical
/// pair of every slot is (larger, smaller).
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Symmetric;

impl Addressing for Symmetric {
    const IS_SYMMETRIC: bool = true;

    #[inline(always)]
    fn capacity(bi_size: usize) -> usize {
        triangular(bi_size)
    }

    #[inline(always)]
    fn to_linear(_bi_size: usize, a: usize, b: usize) -> usize {
        if b > a {
            triangular(b) + a
        } else {
            triangular(a) + b
        }
    }

    fn from_linear(_bi_size: usize, index: usize) -> (usize, usize) {
        // largest a with triangular(a) <= index; the float estimate can be off
        // by one for large indices, so settle it with integer arithmetic
        let mut a = (((8.0 * index as f64 + 1.0).sqrt() - 1.0) / 2.0) as usize;
        while triangular(a) > index {
            a -= 1;
        }
        while triangular(a + 1) <= index {
            a += 1;
        }
        (a, index - triangular(a))
    }
}

/// Full row-major grid.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Asymmetric;

impl Addressing for Asymmetric {
    const IS_SYMMETRIC: bool = false;

    #[inline(always)]
    fn capacity(bi_size: usize) -> usize {
        bi_size * bi_size
    }

    #[inline(always)]
    fn to_linear(bi_size: usize, a: usize, b: usize) -> usize {
        a * bi_size + b
    }

    fn from_linear(bi_size: usize, index: usize) -> (usize, usize) {
        (index / bi_size, index % bi_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_constants() {
        assert!(Symmetric::IS_SYMMETRIC);
        assert!(!Asymmetric::IS_SYMMETRIC);
        assert_eq!(std::mem::size_of::<Symmetric>(), 0);
        assert_eq!(std::mem::size_of::<Asymmetric>(), 0);
    }

    #[test]
    fn test_capacity() {
        assert_eq!(Symmetric::capacity(0), 0);
        assert_eq!(Symmetric::capacity(1), 1);
        assert_eq!(Symmetric::capacity(4), 10);
        assert_eq!(Asymmetric::capacity(4), 16);
    }

    #[test]
    fn test_symmetric_layout() {
        // row-by-row packing of the lower triangle
        let expected = [(0, 0), (1, 0), (1, 1), (2, 0), (2, 1), (2, 2)];
        for (i, &(a, b)) in expected.iter().enumerate() {
            assert_eq!(Symmetric::to_linear(3, a, b), i);
            assert_eq!(Symmetric::to_linear(3, b, a), i);
            assert_eq!(Symmetric::from_linear(3, i), (a, b));
        }
    }

    #[test]
    fn test_symmetric_inverse_exhaustive() {
        let n = 300;
        let mut i = 0;
        for a in 0..n {
            for b in 0..=a {
                assert_eq!(Symmetric::from_linear(n, i), (a, b));
                i += 1;
            }
        }
        assert_eq!(i, Symmetric::capacity(n));
    }

    #[test]
    fn test_symmetric_inverse_large_indices() {
        // rows far beyond any detector size still invert exactly
        for a in [65_535usize, 1 << 20, (1 << 26) + 7] {
            for b in [0, a / 2, a] {
                let i = Symmetric::to_linear(a + 1, a, b);
                assert_eq!(Symmetric::from_linear(a + 1, i), (a, b));
            }
        }
    }

    #[test]
    fn test_asymmetric_roundtrip() {
        let n = 7;
        for a in 0..n {
            for b in 0..n {
                let i = Asymmetric::to_linear(n, a, b);
                assert_eq!(Asymmetric::from_linear(n, i), (a, b));
            }
        }
        assert_ne!(Asymmetric::to_linear(n, 1, 0), Asymmetric::to_linear(n, 0, 1));
    }
}
