//! Type classes shared by the persistent collections.
//!
//! The collections expose a narrow algebraic surface so that generic code can
//! fold and combine them without knowing which collection it holds:
//!
//! - [`TypeConstructor`]: higher-kinded type emulation through GATs
//! - [`Foldable`]: reducing a structure to a summary value
//! - [`Semigroup`]: an associative binary operation
//! - [`Monoid`]: a semigroup with an identity element
//!
//! [`Sum`], [`Product`], [`Max`] and [`Min`] select which operation a numeric
//! value combines with.
//!
//! # Examples
//!
//! ```rust
//! use arbors::persistent::PersistentList;
//! use arbors::typeclass::{Foldable, Monoid, Semigroup, Sum};
//!
//! let left: PersistentList<i32> = (1..=3).collect();
//! let right: PersistentList<i32> = (4..=6).collect();
//!
//! let joined = left.combine(right);
//! assert_eq!(joined.len(), 6);
//!
//! let total: Sum<i32> = joined.fold_map(Sum);
//! assert_eq!(total, Sum(21));
//! assert!(PersistentList::<i32>::empty().is_empty());
//! ```

mod foldable;
mod higher;
mod monoid;
mod semigroup;
mod wrappers;

pub use foldable::Foldable;
pub use higher::TypeConstructor;
pub use monoid::Monoid;
pub use semigroup::Semigroup;
pub use wrappers::{Max, Min, Product, Sum};
