//! # Index Matrix Storage
//!
//! ## Role
//! Two-dimensional maps over a dense index range, the storage behind every
//! pairwise cache in the crate.
//!
//! ## Design: Policy as a Type Parameter
//! The two matrix shapes differ only in how a coordinate pair maps to a
//! slot. There are exactly two layouts, so they are a closed pair of sealed
//! marker types:
//!
//! ```rust,ignore
//! pub struct IndexMatrix<T: MatrixElement, A: Addressing> { .. }
//!
//! pub type SymmetricIndexMatrix<T>  = IndexMatrix<T, Symmetric>;   // N(N+1)/2 slots
//! pub type AsymmetricIndexMatrix<T> = IndexMatrix<T, Asymmetric>;  // N² slots
//! ```
//!
//! The address computation inlines into `get`/`set`; no dynamic dispatch in
//! hot loops.
//!
//! ## Element Types
//! | Element | Backing store          | Unset value |
//! |---------|------------------------|-------------|
//! | `f64`   | `Vec<f64>`             | `NaN`       |
//! | `f32`   | `Vec<f32>`             | `NaN`       |
//! | `bool`  | `BitVec<u64, Lsb0>`    | `false`     |
//! | `u8..u64` | `Vec<_>`             | `0`         |

pub mod addressing;
pub mod index_matrix;
pub mod slots;

pub use addressing::{triangular, Addressing, Asymmetric, Symmetric};
pub use index_matrix::{AsymmetricIndexMatrix, IndexMatrix, SymmetricIndexMatrix};
pub use slots::{MatrixElement, SlotStore};
