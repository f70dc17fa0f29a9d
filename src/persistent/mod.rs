//! Persistent (immutable) collections over a shared AVL tree engine.
//!
//! This module provides three immutable collections that use structural
//! sharing to minimize copying:
//!
//! - [`PersistentList`]: position-ordered sequence with O(log N) indexing
//! - [`PersistentTreeMap`]: key-ordered map under an injected [`Comparator`]
//! - [`PersistentTreeSet`]: key-ordered set under an injected [`Comparator`]
//!
//! # Structural Sharing
//!
//! Every update copies only the nodes on the path from the root to the
//! changed entry, then rebalances that path. All other subtrees are shared
//! between the old and the new version, and both remain fully usable.
//!
//! # Iteration
//!
//! Iterators walk the tree with an explicit stack taken from a [`StackPool`].
//! They can start at any offset in O(log N) and run in either [`Direction`].
//!
//! # Examples
//!
//! ## `PersistentList`
//!
//! ```rust
//! use arbors::persistent::PersistentList;
//!
//! let list: PersistentList<i32> = (1..=5).collect();
//! let inserted = list.insert(2, 99).unwrap();
//!
//! assert_eq!(inserted.get(2), Some(&99));
//! assert_eq!(inserted.get(3), Some(&3));
//! assert_eq!(list.len(), 5);
//! ```
//!
//! ## `PersistentTreeMap`
//!
//! ```rust
//! use arbors::persistent::PersistentTreeMap;
//!
//! let map = PersistentTreeMap::new()
//!     .add_or_update(3, "three")
//!     .add_or_update(1, "one")
//!     .add_or_update(2, "two");
//!
//! let range: Vec<(&i32, &&str)> = map.range(1..=2).collect();
//! assert_eq!(range, vec![(&1, &"one"), (&2, &"two")]);
//! ```
//!
//! ## `PersistentTreeSet`
//!
//! ```rust
//! use arbors::persistent::PersistentTreeSet;
//!
//! let set: PersistentTreeSet<i32> = [1, 2, 3].into_iter().collect();
//! let other: PersistentTreeSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(set.intersect(&other).len(), 2);
//! assert!(set.overlaps(&other));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod algebra;
mod balance;
mod comparator;
mod engine;
mod hash_code;
mod list;
mod node;
mod pool;
mod traversal;
mod treemap;
mod treeset;

pub use comparator::Comparator;
pub use comparator::ComparatorFn;
pub use comparator::NaturalOrder;
pub use comparator::ReverseOrder;
pub use list::PersistentList;
pub use list::PersistentListIntoIterator;
pub use list::PersistentListIterator;
pub use pool::PoolStatistics;
pub use pool::StackPool;
pub use pool::StackPoolConfig;
pub use traversal::Direction;
pub use treemap::PersistentTreeMap;
pub use treemap::PersistentTreeMapIntoIterator;
pub use treemap::PersistentTreeMapIterator;
pub use treeset::PersistentTreeSet;
pub use treeset::PersistentTreeSetIterator;

// =============================================================================
// Thread Safety
// =============================================================================

static_assertions::assert_impl_all!(StackPool: Send, Sync);
static_assertions::assert_impl_all!(StackPoolConfig: Send, Sync, Copy);

#[cfg(feature = "arc")]
mod arc_thread_safety {
    use super::{PersistentList, PersistentTreeMap, PersistentTreeSet};

    static_assertions::assert_impl_all!(PersistentList<i32>: Send, Sync);
    static_assertions::assert_impl_all!(PersistentTreeMap<String, i32>: Send, Sync);
    static_assertions::assert_impl_all!(PersistentTreeSet<String>: Send, Sync);
}

#[cfg(not(feature = "arc"))]
mod rc_thread_safety {
    use super::{PersistentList, PersistentTreeMap, PersistentTreeSet};

    static_assertions::assert_not_impl_any!(PersistentList<i32>: Send, Sync);
    static_assertions::assert_not_impl_any!(PersistentTreeMap<String, i32>: Send, Sync);
    static_assertions::assert_not_impl_any!(PersistentTreeSet<String>: Send, Sync);
}

// =============================================================================
// Tests
// =============================================================================
