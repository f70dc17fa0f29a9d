//! Total orders injected into the key-ordered collections.
//!
//! [`PersistentTreeMap`](super::PersistentTreeMap) and
//! [`PersistentTreeSet`](super::PersistentTreeSet) take their ordering as a
//! type parameter implementing [`Comparator`]. The default, [`NaturalOrder`],
//! defers to [`Ord`] and is zero-sized, so a map over `Ord` keys pays nothing
//! for the indirection.
//!
//! # Precondition
//!
//! A comparator must be a total order that stays consistent for the lifetime
//! of every collection built with it. This is not checked: an inconsistent
//! comparator silently breaks key lookup and ordering, though never memory
//! safety or the balance of the tree.

use std::cmp::Ordering;
use std::fmt;

/// A total order over `K`.
///
/// # Examples
///
/// ```rust
/// use arbors::persistent::{Comparator, PersistentTreeSet};
/// use std::cmp::Ordering;
///
/// #[derive(Clone, Copy, Default)]
/// struct ByLength;
///
/// impl Comparator<String> for ByLength {
///     fn compare(&self, left: &String, right: &String) -> Ordering {
///         left.len().cmp(&right.len())
///     }
/// }
///
/// let words = PersistentTreeSet::with_comparator(ByLength)
///     .try_add("three".to_string())
///     .try_add("a".to_string())
///     .try_add("to".to_string());
/// let ordered: Vec<&str> = words.iter().map(String::as_str).collect();
/// assert_eq!(ordered, vec!["a", "to", "three"]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &K, right: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

/// Inverts another comparator.
///
/// ```rust
/// use arbors::persistent::{NaturalOrder, PersistentTreeSet, ReverseOrder};
///
/// let set = PersistentTreeSet::with_comparator(ReverseOrder(NaturalOrder))
///     .try_add(1)
///     .try_add(3)
///     .try_add(2);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self.0.compare(right, left)
    }
}

/// Adapts a closure into a [`Comparator`].
#[derive(Clone, Copy)]
pub struct ComparatorFn<F>(pub F);

impl<F> fmt::Debug for ComparatorFn<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ComparatorFn")
    }
}

impl<K: ?Sized, F> Comparator<K> for ComparatorFn<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        (self.0)(left, right)
    }
}

impl<K: ?Sized, C: Comparator<K> + ?Sized> Comparator<K> for &C {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        (**self).compare(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 2, Ordering::Less)]
    #[case(2, 2, Ordering::Equal)]
    #[case(3, 2, Ordering::Greater)]
    fn test_natural_order(#[case] left: i32, #[case] right: i32, #[case] expected: Ordering) {
        assert_eq!(NaturalOrder.compare(&left, &right), expected);
    }

    #[rstest]
    fn test_reverse_order_flips() {
        let comparator = ReverseOrder(NaturalOrder);
        assert_eq!(comparator.compare(&1, &2), Ordering::Greater);
        assert_eq!(comparator.compare(&2, &2), Ordering::Equal);
    }

    #[rstest]
    fn test_comparator_fn_and_reference() {
        let by_abs = ComparatorFn(|left: &i32, right: &i32| left.abs().cmp(&right.abs()));
        assert_eq!(by_abs.compare(&-5, &3), Ordering::Greater);
        let borrowed = &by_abs;
        assert_eq!(borrowed.compare(&-2, &2), Ordering::Equal);
    }

    #[rstest]
    fn test_natural_order_on_unsized() {
        assert_eq!(NaturalOrder.compare("apple", "banana"), Ordering::Less);
    }
}
