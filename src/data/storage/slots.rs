//! # Backing Stores
//!
//! Flat slot storage behind an `IndexMatrix`. Numeric elements live in a
//! plain `Vec`, booleans are bit-packed so that whole-matrix `|=`/`&=` run
//! one `u64` word at a time.

use std::fmt::Debug;

use bitvec::prelude::*;

/// Linear slot storage with a fixed length
pub trait SlotStore: Clone + Debug + Send + Sync {
    type Value: Copy;

    /// Store of `len` slots all holding `value`
    fn filled(len: usize, value: Self::Value) -> Self;

    /// Store holding the given values in order
    fn from_values<I: IntoIterator<Item = Self::Value>>(values: I) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read slot `index`; panics past the end
    fn load(&self, index: usize) -> Self::Value;

    /// Write slot `index`; panics past the end
    fn store(&mut self, index: usize, value: Self::Value);
}

impl<T: Copy + Debug + Send + Sync> SlotStore for Vec<T> {
    type Value = T;

    fn filled(len: usize, value: T) -> Self {
        vec![value; len]
    }

    fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        values.into_iter().collect()
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn load(&self, index: usize) -> T {
        self[index]
    }

    #[inline]
    fn store(&mut self, index: usize, value: T) {
        self[index] = value;
    }
}

impl SlotStore for BitVec<u64, Lsb0> {
    type Value = bool;

    fn filled(len: usize, value: bool) -> Self {
        BitVec::repeat(value, len)
    }

    fn from_values<I: IntoIterator<Item = bool>>(values: I) -> Self {
        values.into_iter().collect()
    }

    #[inline]
    fn len(&self) -> usize {
        BitVec::len(self)
    }

    #[inline]
    fn load(&self, index: usize) -> bool {
        self[index]
    }

    #[inline]
    fn store(&mut self, index: usize, value: bool) {
        self.set(index, value);
    }
}

/// Element types an `IndexMatrix` can hold, with their backing store and
/// "unset" sentinel.
pub trait MatrixElement: Copy + Debug + Send + Sync + 'static {
    type Store: SlotStore<Value = Self>;

    /// Value of a slot that was never written
    const UNSET: Self;
}

impl MatrixElement for f64 {
    type Store = Vec<f64>;
    const UNSET: Self = f64::NAN;
}

impl MatrixElement for f32 {
    type Store = Vec<f32>;
    const UNSET: Self = f32::NAN;
}

impl MatrixElement for bool {
    type Store = BitVec<u64, Lsb0>;
    const UNSET: Self = false;
}

macro_rules! unsigned_element {
    ($($t:ty),*) => {
        $(
            impl MatrixElement for $t {
                type Store = Vec<$t>;
                const UNSET: Self = 0;
            }
        )*
    };
}

unsigned_element!(u8, u16, u32, u64);
