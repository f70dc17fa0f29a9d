//! Persistent (immutable) ordered set based on an AVL tree.
//!
//! [`PersistentTreeSet`] runs on the same tree engine as
//! [`PersistentTreeMap`](super::PersistentTreeMap), with an empty value slot
//! in every node.
//!
//! # Examples
//!
//! ```rust
//! use arbors::persistent::PersistentTreeSet;
//!
//! let left: PersistentTreeSet<i32> = [1, 2, 3].into_iter().collect();
//! let right: PersistentTreeSet<i32> = [3, 4, 5].into_iter().collect();
//!
//! let union: Vec<i32> = left.union(&right).iter().copied().collect();
//! assert_eq!(union, vec![1, 2, 3, 4, 5]);
//!
//! let difference: Vec<i32> = left.except(&right).iter().copied().collect();
//! assert_eq!(difference, vec![1, 2]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::{Bound, RangeBounds};

use super::algebra;
use super::balance::{self, build_from_vec};
use super::comparator::{Comparator, NaturalOrder};
use super::engine::{self, Collision, Insertion, KeyProbe};
use super::hash_code::{HashCache, element_hash, fold_hashes};
use super::node::{Side, Tree};
use super::pool::StackPool;
use super::traversal::{Direction, Traversal};
use crate::error::{CollectionError, CollectionResult, InvariantViolation};
use crate::typeclass::{Foldable, Monoid, Semigroup, TypeConstructor};

/// A persistent (immutable) ordered set.
///
/// Elements are kept in ascending order under the comparator `C`, and no two
/// elements compare equal.
///
/// # Time Complexity
///
/// | Operation                  | Complexity          |
/// |----------------------------|---------------------|
/// | `contains`, `find`         | O(log N)            |
/// | `add`, `try_add`, `remove` | O(log N)            |
/// | `union`, `intersect`       | O(M log(N / M + 1)) |
/// | `len`                      | O(1)                |
pub struct PersistentTreeSet<T, C = NaturalOrder> {
    root: Tree<T, ()>,
    comparator: C,
    hash: HashCache,
}

impl<T, C: Clone> Clone for PersistentTreeSet<T, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            comparator: self.comparator.clone(),
            hash: self.hash.clone(),
        }
    }
}

impl<T> PersistentTreeSet<T> {
    /// Creates a new empty set ordered by `T`'s [`Ord`] implementation.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Ord + Clone> PersistentTreeSet<T> {
    /// Creates a set containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().try_add(element)
    }
}

impl<T, C> PersistentTreeSet<T, C> {
    /// Creates a new empty set ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            root: Tree::Empty,
            comparator,
            hash: HashCache::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the comparator ordering this set.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.root.edge(Side::Left).map(|node| &node.key)
    }

    /// Returns the largest element.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.root.edge(Side::Right).map(|node| &node.key)
    }

    /// Returns an iterator over the elements in ascending order.
    #[must_use]
    pub fn iter(&self) -> PersistentTreeSetIterator<'_, T> {
        self.iter_with(StackPool::shared(), Direction::Forward, 0)
    }

    /// Returns an iterator over the elements in descending order.
    #[must_use]
    pub fn iter_reversed(&self) -> PersistentTreeSetIterator<'_, T> {
        self.iter_with(StackPool::shared(), Direction::Reverse, 0)
    }

    /// Returns an iterator in `direction` that skips the first `offset`
    /// elements of that direction, with its stack taken from `pool`.
    #[must_use]
    pub fn iter_with<'a>(
        &'a self,
        pool: &'a StackPool,
        direction: Direction,
        offset: usize,
    ) -> PersistentTreeSetIterator<'a, T> {
        PersistentTreeSetIterator {
            inner: Traversal::new(&self.root, pool, direction, offset),
        }
    }

    /// Folds the elements in ascending order.
    pub fn fold<B, F>(&self, init: B, function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.iter().fold(init, function)
    }

    /// Returns `true` if any element satisfies `predicate`.
    pub fn exists<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Returns `true` if every element satisfies `predicate`.
    pub fn for_all<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(predicate)
    }

    /// Returns the memoized hash code of the set.
    #[must_use]
    pub fn hash_code(&self) -> u64
    where
        T: Hash,
    {
        self.hash
            .get_or_compute(|| fold_hashes(self.iter().map(element_hash)))
    }
}

impl<T, C: Comparator<T>> PersistentTreeSet<T, C> {
    /// Returns `true` if the set contains an element equal to `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.find(element).is_some()
    }

    /// Returns the stored element equal to `element`.
    ///
    /// With a comparator coarser than equality the stored element may differ
    /// from the argument.
    #[must_use]
    pub fn find(&self, element: &T) -> Option<&T> {
        engine::find(&self.root, &mut KeyProbe::new(element, &self.comparator)).map(|node| &node.key)
    }

    /// Returns the stored element equal to `element`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::KeyNotFound`] if no element is equal.
    pub fn lookup(&self, element: &T) -> CollectionResult<&T> {
        self.find(element).ok_or(CollectionError::KeyNotFound)
    }

    /// Returns the elements within `range`, in ascending order.
    pub fn range<R>(&self, range: R) -> PersistentTreeSetIterator<'_, T>
    where
        R: RangeBounds<T>,
    {
        self.range_between(range.start_bound(), range.end_bound())
    }

    /// Returns the elements between `from` and `to`, both inclusive. The
    /// bounds may be given in either order.
    pub fn find_range(&self, from: &T, to: &T) -> PersistentTreeSetIterator<'_, T> {
        let (low, high) = match self.comparator.compare(from, to) {
            Ordering::Greater => (to, from),
            _ => (from, to),
        };
        self.range_between(Bound::Included(low), Bound::Included(high))
    }

    fn range_between(&self, lower: Bound<&T>, upper: Bound<&T>) -> PersistentTreeSetIterator<'_, T> {
        let positions = engine::positions(&self.root, lower, upper, &self.comparator);
        PersistentTreeSetIterator {
            inner: Traversal::window(
                &self.root,
                StackPool::shared(),
                Direction::Forward,
                positions.start,
                positions.len(),
            ),
        }
    }

    /// Returns `true` if the sets share at least one element.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.len() <= other.len() {
            self.iter().any(|element| other.contains(element))
        } else {
            other.iter().any(|element| self.contains(element))
        }
    }

    /// Verifies the structural invariants and that elements are strictly
    /// ascending under the comparator.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.root.check_structure()?;
        let mut previous: Option<&T> = None;
        for (position, element) in self.iter().enumerate() {
            if let Some(before) = previous
                && self.comparator.compare(before, element) != Ordering::Less
            {
                return Err(InvariantViolation::OutOfOrder {
                    position: position - 1,
                });
            }
            previous = Some(element);
        }
        Ok(())
    }
}

impl<T, C> PersistentTreeSet<T, C>
where
    T: Clone,
    C: Comparator<T> + Clone,
{
    /// Builds a set ordered by `comparator` from `elements`.
    ///
    /// Of several elements comparing equal, the last one is kept.
    #[must_use]
    pub fn from_elements<I>(comparator: C, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut sorted: Vec<T> = elements.into_iter().collect();
        sorted.sort_by(|left, right| comparator.compare(left, right));
        let mut unique: Vec<(T, ())> = Vec::with_capacity(sorted.len());
        for element in sorted {
            match unique.last_mut() {
                Some(last) if comparator.compare(&last.0, &element) == Ordering::Equal => {
                    last.0 = element;
                }
                _ => unique.push((element, ())),
            }
        }
        Self {
            root: build_from_vec(unique),
            comparator,
            hash: HashCache::new(),
        }
    }

    fn derive(&self, root: Tree<T, ()>) -> Self {
        Self {
            root,
            comparator: self.comparator.clone(),
            hash: HashCache::new(),
        }
    }

    fn insert_element(&self, element: T) -> Insertion<T, ()> {
        let probe_key = element.clone();
        engine::insert(
            &self.root,
            &mut KeyProbe::new(&probe_key, &self.comparator),
            element,
            (),
            Collision::Keep,
        )
    }

    /// Returns a new set with `element` added.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateKey`] if an equal element is
    /// already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::CollectionError;
    /// use arbors::persistent::PersistentTreeSet;
    ///
    /// let set = PersistentTreeSet::singleton(1);
    /// assert_eq!(set.add(2).map(|set| set.len()), Ok(2));
    /// assert_eq!(set.add(1), Err(CollectionError::DuplicateKey));
    /// ```
    pub fn add(&self, element: T) -> CollectionResult<Self> {
        match self.insert_element(element) {
            Insertion::Added(root) | Insertion::Replaced(root) => Ok(self.derive(root)),
            Insertion::Occupied => Err(CollectionError::DuplicateKey),
        }
    }

    /// Returns a new set with `element` added, or this set unchanged if an
    /// equal element is already present.
    #[must_use]
    pub fn try_add(&self, element: T) -> Self {
        match self.insert_element(element) {
            Insertion::Added(root) | Insertion::Replaced(root) => self.derive(root),
            Insertion::Occupied => self.clone(),
        }
    }

    /// Returns a new set without `element`. Absent elements are ignored.
    #[must_use]
    pub fn remove(&self, element: &T) -> Self {
        engine::remove(&self.root, &mut KeyProbe::new(element, &self.comparator))
            .map_or_else(|| self.clone(), |root| self.derive(root))
    }

    /// Returns the elements satisfying `predicate`.
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let root = balance::filter(&self.root, &mut |element: &T, _: &()| predicate(element));
        if root.ptr_eq(&self.root) {
            return self.clone();
        }
        self.derive(root)
    }

    /// Returns the elements of either set. Where both hold equal elements,
    /// this set's element is kept.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.derive(algebra::union(&self.root, &other.root, &self.comparator))
    }

    /// Returns the elements of this set also present in `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        self.derive(algebra::intersection(&self.root, &other.root, &self.comparator))
    }

    /// Returns the elements of this set absent from `other`.
    #[must_use]
    pub fn except(&self, other: &Self) -> Self {
        self.derive(algebra::difference(&self.root, &other.root, &self.comparator))
    }

    /// Returns the elements present in exactly one of the sets.
    #[must_use]
    pub fn symmetric_except(&self, other: &Self) -> Self {
        self.derive(algebra::symmetric_difference(
            &self.root,
            &other.root,
            &self.comparator,
        ))
    }

    /// Returns `true` if every element of this set is in `other`.
    ///
    /// ```rust
    /// use arbors::persistent::PersistentTreeSet;
    ///
    /// let small: PersistentTreeSet<i32> = [2, 3].into_iter().collect();
    /// let large: PersistentTreeSet<i32> = (1..=5).collect();
    /// assert!(small.is_subset_of(&large));
    /// assert!(large.is_superset_of(&small));
    /// assert!(!large.is_subset_of(&small));
    /// ```
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.len() <= other.len()
            && algebra::difference(&self.root, &other.root, &self.comparator).is_empty()
    }

    /// Returns `true` if every element of `other` is in this set.
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.len() <= self.len()
            && algebra::difference(&other.root, &self.root, &self.comparator).is_empty()
    }

    /// Returns the set of transformed elements under natural order.
    ///
    /// The results are sorted afresh, so the mapping need not preserve order
    /// and may merge elements.
    ///
    /// ```rust
    /// use arbors::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = [-2, -1, 0, 1, 2].into_iter().collect();
    /// let squares: Vec<i32> = set.map(|n| n * n).iter().copied().collect();
    /// assert_eq!(squares, vec![0, 1, 4]);
    /// ```
    #[must_use]
    pub fn map<U, F>(&self, function: F) -> PersistentTreeSet<U>
    where
        U: Ord + Clone,
        F: FnMut(&T) -> U,
    {
        PersistentTreeSet::from_elements(NaturalOrder, self.iter().map(function))
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over elements of a [`PersistentTreeSet`].
pub struct PersistentTreeSetIterator<'a, T> {
    inner: Traversal<'a, T, ()>,
}

impl<'a, T> Iterator for PersistentTreeSetIterator<'a, T> {
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

impl<T> ExactSizeIterator for PersistentTreeSetIterator<'_, T> {}

impl<T> FusedIterator for PersistentTreeSetIterator<'_, T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, C: Default> Default for PersistentTreeSet<T, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Ord + Clone> FromIterator<T> for PersistentTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_elements(NaturalOrder, iter)
    }
}

impl<'a, T, C> IntoIterator for &'a PersistentTreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = PersistentTreeSetIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq, C> PartialEq for PersistentTreeSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.root.ptr_eq(&other.root) || self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for PersistentTreeSet<T, C> {}

impl<T: Hash, C> Hash for PersistentTreeSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PersistentTreeSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, C> fmt::Display for PersistentTreeSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T, C> TypeConstructor for PersistentTreeSet<T, C> {
    type Inner = T;
    type WithType<B> = PersistentTreeSet<B, C>;
}

impl<T: Clone, C: Clone> Foldable for PersistentTreeSet<T, C> {
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

/// Sets combine by union.
impl<T: Clone, C: Comparator<T> + Clone> Semigroup for PersistentTreeSet<T, C> {
    fn combine(self, other: Self) -> Self {
        self.union(&other)
    }
}

impl<T: Clone, C: Comparator<T> + Clone + Default> Monoid for PersistentTreeSet<T, C> {
    fn empty() -> Self {
        Self::default()
    }
}

// =============================================================================
// Tests
// =============================================================================
