//! Persistent (immutable) ordered map based on an AVL tree.
//!
//! This module provides [`PersistentTreeMap`], an immutable map that keeps
//! its entries sorted by key under an injected [`Comparator`].
//!
//! # Overview
//!
//! - O(log N) `find`, `add`, `add_or_update` and `remove`
//! - O(log N) seek to the start of a range
//! - O(N) bulk construction from an iterator
//! - Join-based union, intersection and differences
//!
//! Iteration always yields entries in ascending comparator order, whatever
//! order they were added in.
//!
//! # Strict and lenient operations
//!
//! | Lenient              | Strict        | On conflict                     |
//! |----------------------|---------------|---------------------------------|
//! | `find`               | `lookup`, `[]`| `KeyNotFound` / panic           |
//! | `try_add`            | `add`         | `DuplicateKey`                  |
//! | `add_or_update`      | `set_item`    | `KeyNotFound`                   |
//! | `remove`             |               | absent keys are ignored         |
//!
//! # Examples
//!
//! ```rust
//! use arbors::persistent::PersistentTreeMap;
//!
//! let map = PersistentTreeMap::new()
//!     .add_or_update(3, "three")
//!     .add_or_update(1, "one")
//!     .add_or_update(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.add_or_update(1, "ONE");
//! assert_eq!(map.find(&1), Some(&"one"));
//! assert_eq!(updated.find(&1), Some(&"ONE"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::{Bound, Index, RangeBounds};

use super::algebra;
use super::balance::{self, build_from_vec};
use super::comparator::{Comparator, NaturalOrder};
use super::engine::{self, Collision, Insertion, KeyProbe};
use super::hash_code::{HashCache, element_hash, fold_hashes};
use super::node::{Side, Tree};
use super::pool::StackPool;
use super::traversal::{Direction, Traversal};
use crate::error::{CollectionError, CollectionResult, InvariantViolation};
use crate::typeclass::{Foldable, TypeConstructor};

/// A persistent (immutable) ordered map.
///
/// Keys are ordered by the comparator `C`, which defaults to the key type's
/// [`Ord`] implementation. No two keys of a map compare equal.
///
/// # Time Complexity
///
/// | Operation                      | Complexity          |
/// |--------------------------------|---------------------|
/// | `find`, `contains_key`         | O(log N)            |
/// | `add`, `add_or_update`         | O(log N)            |
/// | `remove`                       | O(log N)            |
/// | `min`, `max`                   | O(log N)            |
/// | `range` (first element)        | O(log N)            |
/// | `union`, `intersect`, `except` | O(M log(N / M + 1)) |
/// | `len`                          | O(1)                |
///
/// # Examples
///
/// ```rust
/// use arbors::persistent::PersistentTreeMap;
///
/// let map: PersistentTreeMap<i32, &str> =
///     [(3, "three"), (1, "one"), (2, "two")].into_iter().collect();
///
/// assert_eq!(map.min(), Some((&1, &"one")));
/// assert_eq!(map.max(), Some((&3, &"three")));
/// ```
pub struct PersistentTreeMap<K, V, C = NaturalOrder> {
    root: Tree<K, V>,
    comparator: C,
    hash: HashCache,
}

impl<K, V, C: Clone> Clone for PersistentTreeMap<K, V, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            comparator: self.comparator.clone(),
            hash: self.hash.clone(),
        }
    }
}

impl<K, V> PersistentTreeMap<K, V> {
    /// Creates a new empty map ordered by `K`'s [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord + Clone, V: Clone> PersistentTreeMap<K, V> {
    /// Creates a map containing a single entry.
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().add_or_update(key, value)
    }
}

impl<K, V, C> PersistentTreeMap<K, V, C> {
    /// Creates a new empty map ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::{NaturalOrder, PersistentTreeMap, ReverseOrder};
    ///
    /// let map = PersistentTreeMap::with_comparator(ReverseOrder(NaturalOrder))
    ///     .add_or_update(1, 'a')
    ///     .add_or_update(2, 'b');
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2, 1]);
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            root: Tree::Empty,
            comparator,
            hash: HashCache::new(),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the comparator ordering this map.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root
            .edge(Side::Left)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root
            .edge(Side::Right)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns an iterator over the entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .add_or_update(2, "b")
    ///     .add_or_update(1, "a");
    /// let entries: Vec<(&i32, &&str)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"a"), (&2, &"b")]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentTreeMapIterator<'_, K, V> {
        self.iter_with(StackPool::shared(), Direction::Forward, 0)
    }

    /// Returns an iterator over the entries in descending key order.
    #[must_use]
    pub fn iter_reversed(&self) -> PersistentTreeMapIterator<'_, K, V> {
        self.iter_with(StackPool::shared(), Direction::Reverse, 0)
    }

    /// Returns an iterator in `direction` that skips the first `offset`
    /// entries of that direction, with its stack taken from `pool`.
    #[must_use]
    pub fn iter_with<'a>(
        &'a self,
        pool: &'a StackPool,
        direction: Direction,
        offset: usize,
    ) -> PersistentTreeMapIterator<'a, K, V> {
        PersistentTreeMapIterator {
            inner: Traversal::new(&self.root, pool, direction, offset),
        }
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Folds the entries in ascending key order.
    pub fn fold<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &K, &V) -> B,
    {
        self.iter()
            .fold(init, |accumulator, (key, value)| function(accumulator, key, value))
    }

    /// Returns `true` if any entry satisfies `predicate`.
    pub fn exists<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.iter().any(|(key, value)| predicate(key, value))
    }

    /// Returns `true` if every entry satisfies `predicate`.
    pub fn for_all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.iter().all(|(key, value)| predicate(key, value))
    }

    /// Returns the memoized hash code of the map.
    ///
    /// The code folds the hash of every `(key, value)` pair in key order, so
    /// equal maps built in different orders share it.
    #[must_use]
    pub fn hash_code(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        self.hash
            .get_or_compute(|| fold_hashes(self.iter().map(|entry| element_hash(&entry))))
    }
}

impl<K, V, C: Comparator<K>> PersistentTreeMap<K, V, C> {
    /// Returns a reference to the value for `key`, or `None` if absent.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn find(&self, key: &K) -> Option<&V> {
        engine::find(&self.root, &mut KeyProbe::new(key, &self.comparator)).map(|node| &node.value)
    }

    /// Returns the stored key and value equal to `key`.
    #[must_use]
    pub fn find_entry(&self, key: &K) -> Option<(&K, &V)> {
        engine::find(&self.root, &mut KeyProbe::new(key, &self.comparator))
            .map(|node| (&node.key, &node.value))
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::KeyNotFound`] if `key` is absent.
    pub fn lookup(&self, key: &K) -> CollectionResult<&V> {
        self.find(key).ok_or(CollectionError::KeyNotFound)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the entries whose keys lie within `range`, in ascending order.
    ///
    /// Locating both ends costs O(log N); the returned iterator knows its
    /// exact length up front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, i32> = (0..10).map(|n| (n, n * n)).collect();
    /// let squares: Vec<i32> = map.range(3..6).map(|(_, value)| *value).collect();
    /// assert_eq!(squares, vec![9, 16, 25]);
    /// ```
    pub fn range<R>(&self, range: R) -> PersistentTreeMapIterator<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        self.range_between(range.start_bound(), range.end_bound())
    }

    /// Returns the entries with keys between `from` and `to`, both inclusive.
    ///
    /// The bounds may be given in either order.
    ///
    /// ```rust
    /// use arbors::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, char> = [(1, 'a'), (5, 'e'), (9, 'i')].into_iter().collect();
    /// let keys: Vec<i32> = map.find_range(&9, &4).map(|(key, _)| *key).collect();
    /// assert_eq!(keys, vec![5, 9]);
    /// ```
    pub fn find_range(&self, from: &K, to: &K) -> PersistentTreeMapIterator<'_, K, V> {
        let (low, high) = match self.comparator.compare(from, to) {
            Ordering::Greater => (to, from),
            _ => (from, to),
        };
        self.range_between(Bound::Included(low), Bound::Included(high))
    }

    fn range_between(&self, lower: Bound<&K>, upper: Bound<&K>) -> PersistentTreeMapIterator<'_, K, V> {
        let positions = engine::positions(&self.root, lower, upper, &self.comparator);
        PersistentTreeMapIterator {
            inner: Traversal::window(
                &self.root,
                StackPool::shared(),
                Direction::Forward,
                positions.start,
                positions.len(),
            ),
        }
    }

    /// Verifies the structural invariants and that keys are strictly
    /// ascending under the comparator.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.root.check_structure()?;
        let mut previous: Option<&K> = None;
        for (position, key) in self.keys().enumerate() {
            if let Some(before) = previous
                && self.comparator.compare(before, key) != Ordering::Less
            {
                return Err(InvariantViolation::OutOfOrder {
                    position: position - 1,
                });
            }
            previous = Some(key);
        }
        Ok(())
    }
}

impl<K, V, C> PersistentTreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + Clone,
{
    /// Builds a map ordered by `comparator` from `entries`.
    ///
    /// When several entries share a key, the last one wins. The entries are
    /// sorted once and the tree is built bottom-up in O(N).
    #[must_use]
    pub fn from_entries<I>(comparator: C, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut sorted: Vec<(K, V)> = entries.into_iter().collect();
        sorted.sort_by(|left, right| comparator.compare(&left.0, &right.0));
        let mut unique: Vec<(K, V)> = Vec::with_capacity(sorted.len());
        for entry in sorted {
            match unique.last_mut() {
                Some(last) if comparator.compare(&last.0, &entry.0) == Ordering::Equal => {
                    *last = entry;
                }
                _ => unique.push(entry),
            }
        }
        Self {
            root: build_from_vec(unique),
            comparator,
            hash: HashCache::new(),
        }
    }

    fn derive(&self, root: Tree<K, V>) -> Self {
        Self {
            root,
            comparator: self.comparator.clone(),
            hash: HashCache::new(),
        }
    }

    fn insert_entry(&self, key: K, value: V, collision: Collision) -> Insertion<K, V> {
        let probe_key = key.clone();
        engine::insert(
            &self.root,
            &mut KeyProbe::new(&probe_key, &self.comparator),
            key,
            value,
            collision,
        )
    }

    /// Returns a new map with `key` bound to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateKey`] if the map already contains
    /// `key`. Use [`try_add`](Self::try_add) or
    /// [`add_or_update`](Self::add_or_update) when that is expected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::CollectionError;
    /// use arbors::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().add(1, "one").unwrap();
    /// assert_eq!(map.add(1, "uno"), Err(CollectionError::DuplicateKey));
    /// ```
    pub fn add(&self, key: K, value: V) -> CollectionResult<Self> {
        match self.insert_entry(key, value, Collision::Keep) {
            Insertion::Added(root) | Insertion::Replaced(root) => Ok(self.derive(root)),
            Insertion::Occupied => Err(CollectionError::DuplicateKey),
        }
    }

    /// Returns a new map with `key` bound to `value`, or this map unchanged if
    /// `key` is already present.
    #[must_use]
    pub fn try_add(&self, key: K, value: V) -> Self {
        match self.insert_entry(key, value, Collision::Keep) {
            Insertion::Added(root) | Insertion::Replaced(root) => self.derive(root),
            Insertion::Occupied => self.clone(),
        }
    }

    /// Returns a new map with `key` bound to `value`, replacing any previous
    /// value.
    ///
    /// A replacement keeps the stored key and the shape of the tree; only the
    /// path to the entry is copied.
    #[must_use]
    pub fn add_or_update(&self, key: K, value: V) -> Self {
        match self.insert_entry(key, value, Collision::Replace) {
            Insertion::Added(root) | Insertion::Replaced(root) => self.derive(root),
            Insertion::Occupied => self.clone(),
        }
    }

    /// Returns a new map with the value for an existing `key` replaced.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::KeyNotFound`] if `key` is absent.
    pub fn set_item(&self, key: &K, value: V) -> CollectionResult<Self> {
        engine::update(
            &self.root,
            &mut KeyProbe::new(key, &self.comparator),
            |stored, _| (stored.clone(), value),
        )
        .map(|root| self.derive(root))
        .ok_or(CollectionError::KeyNotFound)
    }

    /// Returns a new map without `key`.
    ///
    /// Removing an absent key is not an error; the map is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::singleton(1, "one");
    /// assert!(map.remove(&1).is_empty());
    /// assert_eq!(map.remove(&2), map);
    /// ```
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        engine::remove(&self.root, &mut KeyProbe::new(key, &self.comparator))
            .map_or_else(|| self.clone(), |root| self.derive(root))
    }

    /// Returns a map with the same keys and transformed values.
    ///
    /// The result has exactly the same shape as this map.
    #[must_use]
    pub fn map_values<W, F>(&self, mut function: F) -> PersistentTreeMap<K, W, C>
    where
        F: FnMut(&K, &V) -> W,
    {
        PersistentTreeMap {
            root: balance::map_entries(&self.root, &mut |key: &K, value: &V| {
                (key.clone(), function(key, value))
            }),
            comparator: self.comparator.clone(),
            hash: HashCache::new(),
        }
    }

    /// Returns the entries satisfying `predicate`.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        let root = balance::filter(&self.root, &mut predicate);
        if root.ptr_eq(&self.root) {
            return self.clone();
        }
        self.derive(root)
    }

    /// Returns the entries of both maps. Where both contain a key, this
    /// map's entry is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentTreeMap;
    ///
    /// let left: PersistentTreeMap<i32, &str> = [(1, "a"), (2, "a")].into_iter().collect();
    /// let right: PersistentTreeMap<i32, &str> = [(2, "b"), (3, "b")].into_iter().collect();
    /// let union = left.union(&right);
    /// assert_eq!(union.find(&2), Some(&"a"));
    /// assert_eq!(union.len(), 3);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.derive(algebra::union(&self.root, &other.root, &self.comparator))
    }

    /// Returns the entries of this map whose key is also in `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        self.derive(algebra::intersection(&self.root, &other.root, &self.comparator))
    }

    /// Returns the entries of this map whose key is not in `other`.
    #[must_use]
    pub fn except(&self, other: &Self) -> Self {
        self.derive(algebra::difference(&self.root, &other.root, &self.comparator))
    }

    /// Returns the entries whose key is in exactly one of the maps.
    #[must_use]
    pub fn symmetric_except(&self, other: &Self) -> Self {
        self.derive(algebra::symmetric_difference(
            &self.root,
            &other.root,
            &self.comparator,
        ))
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over entries of a [`PersistentTreeMap`] in key order.
pub struct PersistentTreeMapIterator<'a, K, V> {
    inner: Traversal<'a, K, V>,
}

impl<'a, K, V> Iterator for PersistentTreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| (&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapIterator<'_, K, V> {}

impl<K, V> FusedIterator for PersistentTreeMapIterator<'_, K, V> {}

/// An owning iterator over entries of a [`PersistentTreeMap`].
pub struct PersistentTreeMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for PersistentTreeMapIntoIterator<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapIntoIterator<K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Default> Default for PersistentTreeMap<K, V, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Ord + Clone, V: Clone> FromIterator<(K, V)> for PersistentTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(NaturalOrder, iter)
    }
}

impl<K: Clone, V: Clone, C> IntoIterator for PersistentTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = PersistentTreeMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        PersistentTreeMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a PersistentTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentTreeMapIterator<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for PersistentTreeMap<K, V, C> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is absent. Use [`PersistentTreeMap::find`] or
    /// [`PersistentTreeMap::lookup`] when it may be.
    #[track_caller]
    fn index(&self, key: &K) -> &Self::Output {
        match self.lookup(key) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for PersistentTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.root.ptr_eq(&other.root) || self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for PersistentTreeMap<K, V, C> {}

/// Hashes the map by its memoized [`hash_code`](PersistentTreeMap::hash_code).
///
/// # Examples
///
/// ```rust
/// use arbors::persistent::PersistentTreeMap;
/// use std::collections::HashMap;
///
/// let mut outer: HashMap<PersistentTreeMap<i32, String>, &str> = HashMap::new();
/// let key = PersistentTreeMap::new()
///     .add_or_update(1, "one".to_string())
///     .add_or_update(2, "two".to_string());
/// outer.insert(key.clone(), "value");
/// assert_eq!(outer.get(&key), Some(&"value"));
/// ```
impl<K: Hash, V: Hash, C> Hash for PersistentTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for PersistentTreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for PersistentTreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

/// `PersistentTreeMap` is treated as a container of its values, with the key
/// type and comparator fixed.
impl<K, V, C> TypeConstructor for PersistentTreeMap<K, V, C> {
    type Inner = V;
    type WithType<B> = PersistentTreeMap<K, B, C>;
}

impl<K: Clone, V: Clone, C: Clone> Foldable for PersistentTreeMap<K, V, C> {
    fn fold_left<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(B, V) -> B,
    {
        self.values()
            .fold(init, |accumulator, value| function(accumulator, value.clone()))
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(V, B) -> B,
    {
        self.iter_reversed()
            .fold(init, |accumulator, (_, value)| function(value.clone(), accumulator))
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    #[inline]
    fn length(&self) -> usize {
        self.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
