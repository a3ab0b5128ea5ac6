//! # Index Matrix
//!
//! A two-dimensional map over the index range `[0, bi_size)` stored in a flat
//! backing store. The `Addressing` parameter decides the layout at compile
//! time:
//!
//! ```ignore
//! let mut sym: SymmetricIndexMatrix<bool> = SymmetricIndexMatrix::new(2);
//! sym.set(1, 0, true);
//! assert!(sym.get(0, 1)); // same slot
//!
//! let mut asym: AsymmetricIndexMatrix<bool> = AsymmetricIndexMatrix::new(2);
//! asym.set(1, 0, true);
//! assert!(!asym.get(0, 1)); // independent slot
//! ```
//!
//! There is no range check on `get`/`set` beyond a `debug_assert!`: indices
//! outside `[0, bi_size)` are a caller bug and panic in the backing store at
//! worst.

use std::marker::PhantomData;
use std::ops::{BitAndAssign, BitOrAssign};

use crate::data::storage::addressing::{Addressing, Asymmetric, Symmetric};
use crate::data::storage::slots::{MatrixElement, SlotStore};
use crate::error::{DomhashError, Result};

/// Flat-array-backed 2-D storage over an index range
#[derive(Clone, Debug)]
pub struct IndexMatrix<T: MatrixElement, A: Addressing> {
    /// Size of the indexable range in one dimension
    bi_size: usize,

    /// Physical slots, `A::capacity(bi_size)` of them
    slots: T::Store,

    /// Phantom data to hold the addressing policy (zero-sized)
    _addressing: PhantomData<A>,
}

/// Packed lower-triangular matrix: `get(a, b) == get(b, a)` always
pub type SymmetricIndexMatrix<T> = IndexMatrix<T, Symmetric>;

/// Full grid matrix: every (a, b) is independent
pub type AsymmetricIndexMatrix<T> = IndexMatrix<T, Asymmetric>;

impl<T: MatrixElement, A: Addressing> IndexMatrix<T, A> {
    /// Create a matrix with every slot unset
    pub fn new(bi_size: usize) -> Self {
        Self::filled(bi_size, T::UNSET)
    }

    /// Create a matrix with every slot holding `value`
    pub fn filled(bi_size: usize, value: T) -> Self {
        Self {
            bi_size,
            slots: T::Store::filled(A::capacity(bi_size), value),
            _addressing: PhantomData,
        }
    }

    /// Create a matrix by evaluating `f` once per physical slot.
    ///
    /// Slots are visited in linear order and `f` receives the pair produced
    /// by the inverse addressing. For `Symmetric` that is always
    /// `(larger, smaller)`, so a non-commutative `f` sees `a >= b`.
    pub fn from_fn<F>(bi_size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let slots = T::Store::from_values((0..A::capacity(bi_size)).map(|i| {
            let (a, b) = A::from_linear(bi_size, i);
            f(a, b)
        }));
        Self {
            bi_size,
            slots,
            _addressing: PhantomData,
        }
    }

    /// Wrap an existing backing store, checking its length against the policy
    pub fn from_store(bi_size: usize, slots: T::Store) -> Result<Self> {
        let expected = A::capacity(bi_size);
        if slots.len() != expected {
            return Err(DomhashError::invalid_data(format!(
                "backing store holds {} slots, {} expected for size {}",
                slots.len(),
                expected,
                bi_size
            )));
        }
        Ok(Self {
            bi_size,
            slots,
            _addressing: PhantomData,
        })
    }

    /// Size of the indexable range, which is `[0, bi_size)`
    pub fn bi_size(&self) -> usize {
        self.bi_size
    }

    /// Number of physical slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether (a, b) and (b, a) share storage
    pub const fn is_symmetric() -> bool {
        A::IS_SYMMETRIC
    }

    /// Linear slot backing (a, b)
    #[inline(always)]
    pub fn linear_index(&self, a: usize, b: usize) -> usize {
        debug_assert!(
            a < self.bi_size && b < self.bi_size,
            "({a}, {b}) outside index range {}",
            self.bi_size
        );
        A::to_linear(self.bi_size, a, b)
    }

    /// Get the value at (a, b)
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> T {
        self.slots.load(self.linear_index(a, b))
    }

    /// Set the value at (a, b)
    #[inline]
    pub fn set(&mut self, a: usize, b: usize, value: T) {
        let index = self.linear_index(a, b);
        self.slots.store(index, value);
    }

    /// Iterate physical slots as `((a, b), value)` in linear order
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        (0..self.slots.len()).map(move |i| (A::from_linear(self.bi_size, i), self.slots.load(i)))
    }

    /// The backing store
    pub fn slots(&self) -> &T::Store {
        &self.slots
    }
}

// ============================================================================
// Boolean matrices: word-wise bit operations
// ============================================================================

impl<A: Addressing> IndexMatrix<bool, A> {
    /// Number of set slots (physical slots, not index pairs)
    pub fn count_ones(&self) -> usize {
        self.slots.count_ones()
    }
}

impl<A: Addressing> BitOrAssign<&IndexMatrix<bool, A>> for IndexMatrix<bool, A> {
    fn bitor_assign(&mut self, rhs: &IndexMatrix<bool, A>) {
        assert_eq!(self.bi_size, rhs.bi_size, "index matrix size mismatch");
        for (lhs, rhs) in self
            .slots
            .as_raw_mut_slice()
            .iter_mut()
            .zip(rhs.slots.as_raw_slice())
        {
            *lhs |= *rhs;
        }
    }
}

impl<A: Addressing> BitAndAssign<&IndexMatrix<bool, A>> for IndexMatrix<bool, A> {
    fn bitand_assign(&mut self, rhs: &IndexMatrix<bool, A>) {
        assert_eq!(self.bi_size, rhs.bi_size, "index matrix size mismatch");
        for (lhs, rhs) in self
            .slots
            .as_raw_mut_slice()
            .iter_mut()
            .zip(rhs.slots.as_raw_slice())
        {
            *lhs &= *rhs;
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl<T: MatrixElement> From<&SymmetricIndexMatrix<T>> for AsymmetricIndexMatrix<T> {
    /// Expand the triangle so both (a, b) and (b, a) hold the shared value
    fn from(sym: &SymmetricIndexMatrix<T>) -> Self {
        Self::from_fn(sym.bi_size(), |a, b| sym.get(a, b))
    }
}
