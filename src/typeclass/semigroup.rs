//! Semigroup type class - types with an associative binary operation.
//!
//! # Laws
//!
//! For all `a`, `b`, `c` of type `T`:
//!
//! ```text
//! (a.combine(b)).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! Persistent lists combine by concatenation and persistent sets by union.
//! Both are associative, and both share every subtree of their operands that
//! comes through unchanged.

use std::ops::{Add, Mul};

use super::wrappers::{Max, Min, Product, Sum};

/// A type class for types with an associative binary operation.
///
/// # Examples
///
/// ```rust
/// use arbors::persistent::PersistentTreeSet;
/// use arbors::typeclass::Semigroup;
///
/// let left: PersistentTreeSet<i32> = [1, 2].into_iter().collect();
/// let right: PersistentTreeSet<i32> = [2, 3].into_iter().collect();
/// assert_eq!(left.combine(right).len(), 3);
/// ```
pub trait Semigroup {
    /// Combines two values. The operation must be associative.
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Combines two borrowed values.
    ///
    /// The default clones both operands. Persistent collections clone in O(1),
    /// so this costs no more than [`combine`](Semigroup::combine) for them.
    #[must_use]
    fn combine_ref(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        self.clone().combine(other.clone())
    }

    /// Folds a sequence with `combine`, or returns `None` if it is empty.
    ///
    /// ```rust
    /// use arbors::typeclass::{Max, Semigroup};
    ///
    /// assert_eq!(Max::reduce_all([Max(3), Max(8), Max(5)]), Some(Max(8)));
    /// assert_eq!(Max::<i32>::reduce_all([]), None);
    /// ```
    fn reduce_all<I>(iterator: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .reduce(|accumulator, element| accumulator.combine(element))
    }
}

// =============================================================================
// Wrapper Implementations
// =============================================================================

impl<A: Add<Output = A>> Semigroup for Sum<A> {
    fn combine(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl<A: Mul<Output = A>> Semigroup for Product<A> {
    fn combine(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }
}

impl<A: Ord> Semigroup for Max<A> {
    fn combine(self, other: Self) -> Self {
        if other.0 > self.0 { other } else { self }
    }
}

impl<A: Ord> Semigroup for Min<A> {
    fn combine(self, other: Self) -> Self {
        if other.0 < self.0 { other } else { self }
    }
}
