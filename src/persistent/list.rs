//! Persistent (immutable) position-ordered list.
//!
//! This module provides [`PersistentList`], an immutable sequence backed by an
//! AVL tree ordered by position. Every node caches the size of its subtree,
//! so the element at any index is found by comparing the index against the
//! size of the left subtree on the way down.
//!
//! # Overview
//!
//! - O(log n) indexed access, insertion, removal and replacement
//! - O(log n) `skip`, `take` and `split_at`
//! - O(log n + k) bulk insertion of `k` elements
//! - O(n) bulk construction and reversal
//!
//! All operations return new lists without modifying the original. A new list
//! shares every subtree that the operation did not touch.
//!
//! # Examples
//!
//! ```rust
//! use arbors::persistent::PersistentList;
//!
//! let list: PersistentList<i32> = (1..=5).collect();
//! assert_eq!(list.get(2), Some(&3));
//!
//! let inserted = list.insert(2, 99).unwrap();
//! assert_eq!(inserted.iter().copied().collect::<Vec<_>>(), vec![1, 2, 99, 3, 4, 5]);
//!
//! // The original is untouched
//! assert_eq!(list.len(), 5);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::Index;

use super::balance::{self, build_from_vec};
use super::engine::{self, Collision, Gap, Insertion, Position};
use super::hash_code::{HashCache, element_hash, fold_hashes};
use super::node::{Side, Tree};
use super::pool::StackPool;
use super::traversal::{Direction, Traversal};
use crate::error::{CollectionError, CollectionResult, InvariantViolation};
use crate::typeclass::{Foldable, Monoid, Semigroup, TypeConstructor};

/// A persistent (immutable) list ordered by position.
///
/// # Time Complexity
///
/// | Operation                         | Complexity   |
/// |-----------------------------------|--------------|
/// | `len`, `is_empty`                 | O(1)         |
/// | `get`, `at`, `first`, `last`      | O(log n)     |
/// | `insert`, `remove_at`, `set_item` | O(log n)     |
/// | `push_back`, `push_front`         | O(log n)     |
/// | `skip`, `take`, `split_at`        | O(log n)     |
/// | `append`                          | O(log n)     |
/// | `insert_range`                    | O(log n + k) |
/// | `reverse`, `map`, `filter`        | O(n)         |
/// | `iter_from(offset)` (seek)        | O(log n)     |
///
/// # Examples
///
/// ```rust
/// use arbors::persistent::PersistentList;
///
/// let list = PersistentList::singleton(42).push_back(43);
/// assert_eq!(list.first(), Some(&42));
/// assert_eq!(list.last(), Some(&43));
/// ```
pub struct PersistentList<T> {
    root: Tree<T, ()>,
    hash: HashCache,
}

impl<T> Clone for PersistentList<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            hash: self.hash.clone(),
        }
    }
}

impl<T> PersistentList<T> {
    /// Creates a new empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = PersistentList::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: Tree::Empty,
            hash: HashCache::new(),
        }
    }

    #[inline]
    const fn from_tree(root: Tree<T, ()>) -> Self {
        Self {
            root,
            hash: HashCache::new(),
        }
    }

    /// Creates a list containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::from_tree(Tree::leaf(element, ()))
    }

    /// Returns the number of elements in the list.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns a reference to the element at `index`, or `None` if `index` is
    /// out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentList;
    ///
    /// let list: PersistentList<char> = "abc".chars().collect();
    /// assert_eq!(list.get(1), Some(&'b'));
    /// assert_eq!(list.get(3), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        engine::find(&self.root, &mut Position(index)).map(|node| &node.key)
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::IndexOutOfRange`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::CollectionError;
    /// use arbors::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (10..13).collect();
    /// assert_eq!(list.at(0), Ok(&10));
    /// assert_eq!(
    ///     list.at(5),
    ///     Err(CollectionError::IndexOutOfRange { index: 5, length: 3 })
    /// );
    /// ```
    pub fn at(&self, index: usize) -> CollectionResult<&T> {
        self.get(index)
            .ok_or_else(|| CollectionError::index_out_of_range(index, self.len()))
    }

    /// Returns the first element, or `None` if the list is empty.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.root.edge(Side::Left).map(|node| &node.key)
    }

    /// Returns the last element, or `None` if the list is empty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.root.edge(Side::Right).map(|node| &node.key)
    }

    /// Returns an iterator over the elements, first to last.
    ///
    /// The iterator borrows its traversal stack from [`StackPool::shared`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=4).collect();
    /// assert_eq!(list.iter().sum::<i32>(), 10);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentListIterator<'_, T> {
        self.iter_with(StackPool::shared(), Direction::Forward, 0)
    }

    /// Returns an iterator starting at `offset`.
    ///
    /// Seeking to `offset` costs O(log n); elements before it are never
    /// visited.
    ///
    /// ```rust
    /// use arbors::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (0..1000).collect();
    /// let tail: Vec<i32> = list.iter_from(997).copied().collect();
    /// assert_eq!(tail, vec![997, 998, 999]);
    /// ```
    #[must_use]
    pub fn iter_from(&self, offset: usize) -> PersistentListIterator<'_, T> {
        self.iter_with(StackPool::shared(), Direction::Forward, offset)
    }

    /// Returns an iterator over the elements, last to first.
    #[must_use]
    pub fn iter_reversed(&self) -> PersistentListIterator<'_, T> {
        self.iter_with(StackPool::shared(), Direction::Reverse, 0)
    }

    /// Returns an iterator in `direction`, skipping the first `offset`
    /// elements of that direction, with its stack taken from `pool`.
    #[must_use]
    pub fn iter_with<'a>(
        &'a self,
        pool: &'a StackPool,
        direction: Direction,
        offset: usize,
    ) -> PersistentListIterator<'a, T> {
        PersistentListIterator {
            inner: Traversal::new(&self.root, pool, direction, offset),
        }
    }

    /// Returns the position of the first element equal to `element`.
    #[must_use]
    pub fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|candidate| candidate == element)
    }

    /// Folds the elements first to last.
    pub fn fold<B, F>(&self, init: B, function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.iter().fold(init, function)
    }

    /// Folds the elements last to first.
    pub fn fold_back<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(&T, B) -> B,
    {
        self.iter_reversed()
            .fold(init, |accumulator, element| function(element, accumulator))
    }

    /// Returns `true` if any element satisfies `predicate`.
    pub fn exists<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Returns `true` if every element satisfies `predicate` (vacuously true
    /// for the empty list).
    pub fn for_all<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(predicate)
    }

    /// Verifies the structural invariants of the underlying tree.
    ///
    /// Every public operation preserves them; this exists for tests and
    /// debugging.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.root.check_structure()
    }

    /// Returns the memoized hash code of the list.
    ///
    /// Equal lists have equal hash codes; the empty list hashes to zero.
    #[must_use]
    pub fn hash_code(&self) -> u64
    where
        T: Hash,
    {
        self.hash
            .get_or_compute(|| fold_hashes(self.iter().map(element_hash)))
    }
}

impl<T: Clone> PersistentList<T> {
    /// Creates a list holding the elements of `slice` in order.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }

    /// Returns a new list with `element` appended.
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        self.insert_unchecked(self.len(), element)
    }

    /// Returns a new list with `element` prepended.
    #[must_use]
    pub fn push_front(&self, element: T) -> Self {
        self.insert_unchecked(0, element)
    }

    fn insert_unchecked(&self, index: usize, element: T) -> Self {
        match engine::insert(&self.root, &mut Gap(index), element, (), Collision::Keep) {
            Insertion::Added(root) | Insertion::Replaced(root) => Self::from_tree(root),
            Insertion::Occupied => self.clone(),
        }
    }

    /// Returns a new list with `element` inserted at `index`, shifting every
    /// later element one position to the right.
    ///
    /// Inserting at `len()` appends.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::IndexOutOfRange`] if `index > len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = vec![1, 3].into_iter().collect();
    /// let list = list.insert(1, 2).unwrap();
    /// let list = list.insert(3, 4).unwrap();
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// assert!(list.insert(9, 0).is_err());
    /// ```
    pub fn insert(&self, index: usize, element: T) -> CollectionResult<Self> {
        if index > self.len() {
            return Err(CollectionError::index_out_of_range(index, self.len()));
        }
        Ok(self.insert_unchecked(index, element))
    }

    /// Returns a new list with every element of `elements` inserted, in order,
    /// starting at `index`.
    ///
    /// The new elements are first built into a balanced tree in O(k) and then
    /// spliced in with a split and two joins.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::IndexOutOfRange`] if `index > len()`.
    pub fn insert_range<I>(&self, index: usize, elements: I) -> CollectionResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        if index > self.len() {
            return Err(CollectionError::index_out_of_range(index, self.len()));
        }
        let subtree = build_from_vec(elements.into_iter().map(|element| (element, ())).collect());
        if subtree.is_empty() {
            return Ok(self.clone());
        }
        Ok(Self::from_tree(balance::splice(&self.root, index, &subtree)))
    }

    /// Returns the concatenation of this list and `other`.
    ///
    /// # Complexity
    ///
    /// O(log n + log m)
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::from_tree(balance::concat(&self.root, &other.root))
    }

    /// Returns a new list without the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::IndexOutOfRange`] if `index >= len()`.
    pub fn remove_at(&self, index: usize) -> CollectionResult<Self> {
        engine::remove(&self.root, &mut Position(index))
            .map(Self::from_tree)
            .ok_or_else(|| CollectionError::index_out_of_range(index, self.len()))
    }

    /// Returns a new list with the element at `index` replaced.
    ///
    /// The shape of the tree is unchanged; only the path to `index` is copied.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::IndexOutOfRange`] if `index >= len()`.
    pub fn set_item(&self, index: usize, element: T) -> CollectionResult<Self> {
        self.update_at(index, |_| element)
    }

    /// Returns a new list with the element at `index` replaced by
    /// `function(element)`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::IndexOutOfRange`] if `index >= len()`.
    pub fn update_at<F>(&self, index: usize, function: F) -> CollectionResult<Self>
    where
        F: FnOnce(&T) -> T,
    {
        engine::update(&self.root, &mut Position(index), |element, _| {
            (function(element), ())
        })
        .map(Self::from_tree)
        .ok_or_else(|| CollectionError::index_out_of_range(index, self.len()))
    }

    /// Returns the list without its first `count` elements.
    ///
    /// Whole subtrees before the cut are dropped without being visited, so
    /// this is O(log n) regardless of `count`. Skipping more elements than
    /// the list holds yields the empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (0..10_000).collect();
    /// let rest = list.skip(9_998);
    /// assert_eq!(rest.iter().copied().collect::<Vec<_>>(), vec![9_998, 9_999]);
    /// ```
    #[must_use]
    pub fn skip(&self, count: usize) -> Self {
        Self::from_tree(balance::skip(&self.root, count))
    }

    /// Returns the first `count` elements.
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        Self::from_tree(balance::take(&self.root, count))
    }

    /// Splits the list into the first `index` elements and the rest.
    ///
    /// An `index` past the end puts everything in the first half.
    #[must_use]
    pub fn split_at(&self, index: usize) -> (Self, Self) {
        let (head, tail) = balance::split_at(&self.root, index);
        (Self::from_tree(head), Self::from_tree(tail))
    }

    /// Returns the list in reverse order.
    ///
    /// The tree is mirrored node by node, which keeps it balanced and takes
    /// O(n).
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self::from_tree(balance::mirror(&self.root))
    }

    /// Returns a list of the results of `function` applied to each element.
    ///
    /// The result has exactly the same shape as this list.
    #[must_use]
    pub fn map<U, F>(&self, mut function: F) -> PersistentList<U>
    where
        F: FnMut(&T) -> U,
    {
        PersistentList::from_tree(balance::map_entries(&self.root, &mut |element, _| {
            (function(element), ())
        }))
    }

    /// Returns the elements satisfying `predicate`, in order.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let root = balance::filter(&self.root, &mut |element, _| predicate(element));
        if root.ptr_eq(&self.root) {
            return self.clone();
        }
        Self::from_tree(root)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`PersistentList`].
pub struct PersistentListIterator<'a, T> {
    inner: Traversal<'a, T, ()>,
}

impl<'a, T> Iterator for PersistentListIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| &node.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentListIterator<'_, T> {}

impl<T> FusedIterator for PersistentListIterator<'_, T> {}

/// An owning iterator over elements of a [`PersistentList`].
pub struct PersistentListIntoIterator<T> {
    elements: std::vec::IntoIter<T>,
}

impl<T> Iterator for PersistentListIntoIterator<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> DoubleEndedIterator for PersistentListIntoIterator<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.elements.next_back()
    }
}

impl<T> ExactSizeIterator for PersistentListIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let entries: Vec<(T, ())> = iter.into_iter().map(|element| (element, ())).collect();
        Self::from_tree(build_from_vec(entries))
    }
}

impl<T: Clone> IntoIterator for PersistentList<T> {
    type Item = T;
    type IntoIter = PersistentListIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        let elements: Vec<T> = self.iter().cloned().collect();
        PersistentListIntoIterator {
            elements: elements.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentList<T> {
    type Item = &'a T;
    type IntoIter = PersistentListIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<usize> for PersistentList<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len()`. Use [`PersistentList::get`] or
    /// [`PersistentList::at`] when the index is not known to be valid.
    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(element) => element,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: PartialEq> PartialEq for PersistentList<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.root.ptr_eq(&other.root) || self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for PersistentList<T> {}

/// Hashes the list by its memoized [`hash_code`](PersistentList::hash_code).
///
/// # Examples
///
/// ```rust
/// use arbors::persistent::PersistentList;
/// use std::collections::HashMap;
///
/// let mut map: HashMap<PersistentList<i32>, &str> = HashMap::new();
/// let key: PersistentList<i32> = (1..=3).collect();
/// map.insert(key.clone(), "value");
/// assert_eq!(map.get(&key), Some(&"value"));
/// ```
impl<T: Hash> Hash for PersistentList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T> TypeConstructor for PersistentList<T> {
    type Inner = T;
    type WithType<B> = PersistentList<B>;
}

impl<T: Clone> Foldable for PersistentList<T> {
    fn fold_left<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(B, T) -> B,
    {
        self.iter()
            .fold(init, |accumulator, element| function(accumulator, element.clone()))
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(T, B) -> B,
    {
        self.iter_reversed()
            .fold(init, |accumulator, element| function(element.clone(), accumulator))
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

impl<T: Clone> Semigroup for PersistentList<T> {
    fn combine(self, other: Self) -> Self {
        self.append(&other)
    }
}

impl<T: Clone> Monoid for PersistentList<T> {
    fn empty() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
