//! Foldable type class - folding over data structures.
//!
//! A `Foldable` can be traversed in a fixed order while an accumulator
//! collects a summary of its elements. The persistent collections fold in
//! their iteration order: by position for lists and by key for maps and sets.
//!
//! # Laws
//!
//! ## Consistency between `fold_left` and `fold_right`
//!
//! ```text
//! fa.fold_left(init, f) == fa.fold_right(init, flip(f))  // when f is associative
//! ```
//!
//! ## Consistency with `to_list`
//!
//! ```text
//! fa.fold_left(init, f) == fa.to_list().into_iter().fold(init, f)
//! ```

use super::higher::TypeConstructor;
use super::monoid::Monoid;

/// A type class for data structures that can be folded to a summary value.
///
/// Only `fold_left` and `fold_right` are required. Every other method is
/// derived from `fold_left`, and implementors with a cheaper answer (such as
/// a cached length) override it.
///
/// # Examples
///
/// ```rust
/// use arbors::persistent::PersistentTreeSet;
/// use arbors::typeclass::{Foldable, Product};
///
/// let set: PersistentTreeSet<i32> = [4, 1, 3, 2].into_iter().collect();
///
/// let ordered = set.clone().fold_left(String::new(), |text, n| format!("{text}{n}"));
/// assert_eq!(ordered, "1234");
///
/// let product: Product<i32> = set.fold_map(Product);
/// assert_eq!(product.0, 24);
/// ```
pub trait Foldable: TypeConstructor {
    /// Folds the structure from first to last element.
    fn fold_left<B, F>(self, init: B, function: F) -> B
    where
        F: FnMut(B, Self::Inner) -> B;

    /// Folds the structure from last to first element.
    ///
    /// ```rust
    /// use arbors::persistent::PersistentList;
    /// use arbors::typeclass::Foldable;
    ///
    /// let list: PersistentList<i32> = (1..=3).collect();
    /// let text = list.fold_right(String::new(), |n, text| format!("{n}{text}"));
    /// assert_eq!(text, "123");
    /// ```
    fn fold_right<B, F>(self, init: B, function: F) -> B
    where
        F: FnMut(Self::Inner, B) -> B;

    /// Maps every element into a [`Monoid`] and combines the results from
    /// left to right.
    fn fold_map<M, F>(self, mut function: F) -> M
    where
        M: Monoid,
        F: FnMut(Self::Inner) -> M,
        Self: Sized,
    {
        self.fold_left(M::empty(), |accumulator, element| {
            accumulator.combine(function(element))
        })
    }

    /// Returns whether the structure has no elements.
    fn is_empty(&self) -> bool
    where
        Self: Clone,
    {
        self.clone().fold_left(true, |_, _| false)
    }

    /// Returns the number of elements.
    fn length(&self) -> usize
    where
        Self: Clone,
    {
        self.clone().fold_left(0, |count, _| count + 1)
    }

    /// Collects the elements into a `Vec` in fold order.
    fn to_list(self) -> Vec<Self::Inner>
    where
        Self: Sized,
    {
        self.fold_left(Vec::new(), |mut accumulator, element| {
            accumulator.push(element);
            accumulator
        })
    }

    /// Returns the first element satisfying `predicate`.
    fn find<P>(self, mut predicate: P) -> Option<Self::Inner>
    where
        P: FnMut(&Self::Inner) -> bool,
        Self: Sized,
    {
        self.fold_left(None, |found, element| match found {
            Some(_) => found,
            None if predicate(&element) => Some(element),
            None => None,
        })
    }

    /// Returns `true` if any element satisfies `predicate`.
    fn exists<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Self::Inner) -> bool,
        Self: Clone,
    {
        Foldable::find(self.clone(), |element| predicate(element)).is_some()
    }

    /// Returns `true` if every element satisfies `predicate`. Vacuously true
    /// for an empty structure.
    fn for_all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Self::Inner) -> bool,
        Self: Clone,
    {
        !Foldable::exists(self, |element| !predicate(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::{PersistentList, PersistentTreeMap, PersistentTreeSet};
    use crate::typeclass::Sum;
    use rstest::rstest;

    #[rstest]
    fn list_folds_in_position_order() {
        let list: PersistentList<char> = "fold".chars().collect();
        let left = list
            .clone()
            .fold_left(String::new(), |mut text, character| {
                text.push(character);
                text
            });
        let right = list.fold_right(String::new(), |character, mut text| {
            text.push(character);
            text
        });
        assert_eq!(left, "fold");
        assert_eq!(right, "dlof");
    }

    #[rstest]
    fn map_folds_over_values_in_key_order() {
        let map: PersistentTreeMap<i32, &str> = [(2, "b"), (1, "a"), (3, "c")].into_iter().collect();
        assert_eq!(Foldable::to_list(map), vec!["a", "b", "c"]);
    }

    #[rstest]
    fn provided_methods_use_iteration_order() {
        let set: PersistentTreeSet<i32> = [5, 3, 9, 1].into_iter().collect();
        assert_eq!(Foldable::find(set.clone(), |n| *n > 3), Some(5));
        assert!(Foldable::exists(&set, |n| *n == 9));
        assert!(Foldable::for_all(&set, |n| n % 2 == 1));
        assert_eq!(Foldable::length(&set), 4);
        assert_eq!(set.fold_map(Sum), Sum(18));
    }

    #[rstest]
    fn empty_structures() {
        let empty: PersistentList<i32> = PersistentList::new();
        assert!(Foldable::is_empty(&empty));
        assert!(Foldable::for_all(&empty, |_| false));
        assert_eq!(empty.fold_map(Sum), Sum(0));
    }
}
