//! # arbors
//!
//! Persistent collections for Rust, built on one self-balancing AVL tree
//! engine with structural sharing.
//!
//! ## Overview
//!
//! Every collection in this crate is an immutable value. Updates return a new
//! version that shares all untouched subtrees with the old one, so keeping
//! old versions around is cheap and always safe.
//!
//! - **[`PersistentList`](persistent::PersistentList)**: a sequence ordered by
//!   position, with O(log N) indexing, insertion and removal anywhere
//! - **[`PersistentTreeMap`](persistent::PersistentTreeMap)**: a map ordered
//!   by an injected comparator, with range queries and set algebra
//! - **[`PersistentTreeSet`](persistent::PersistentTreeSet)**: the set
//!   counterpart of the map
//! - **Traversal**: stack-based iterators that seek to any offset in
//!   O(log N), run forward or in reverse, and borrow their stack from a
//!   thread-safe [`StackPool`](persistent::StackPool)
//! - **Type Classes**: `Foldable`, `Semigroup` and `Monoid` for generic code
//!
//! ## Feature Flags
//!
//! - `typeclass`: Type class traits (`Foldable`, `Monoid`, etc.)
//! - `persistent`: The persistent collections
//! - `arc`: Share tree nodes through `Arc` instead of `Rc`, making every
//!   collection `Send + Sync`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use arbors::prelude::*;
//!
//! let versions: PersistentList<PersistentTreeMap<&str, i32>> = PersistentList::new();
//! let first = PersistentTreeMap::new().add_or_update("apples", 3);
//! let second = first.add_or_update("pears", 4);
//! let versions = versions.push_back(first).push_back(second);
//!
//! assert_eq!(versions[0].len(), 1);
//! assert_eq!(versions[1].len(), 2);
//! assert_eq!(versions[1].clone().fold_map(Sum), Sum(7));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the collections, the type classes and the error types.
///
/// # Usage
///
/// ```rust
/// use arbors::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;

    pub use crate::error::{CollectionError, CollectionResult};
}

pub mod diagnostics;
pub mod error;

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "persistent")]
pub mod persistent;

pub use error::{CollectionError, CollectionResult, InvariantViolation};
