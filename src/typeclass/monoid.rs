//! Monoid type class - semigroups with an identity element.
//!
//! # Laws
//!
//! For all `a` of type `T`, in addition to associativity:
//!
//! ```text
//! T::empty().combine(a) == a
//! a.combine(T::empty()) == a
//! ```

use std::ops::Add;

use super::semigroup::Semigroup;
use super::wrappers::{Product, Sum};

/// A [`Semigroup`] with an identity element.
///
/// # Examples
///
/// ```rust
/// use arbors::persistent::PersistentList;
/// use arbors::typeclass::Monoid;
///
/// let parts = vec![
///     PersistentList::from_slice(&[1, 2]),
///     PersistentList::new(),
///     PersistentList::from_slice(&[3]),
/// ];
/// let joined = PersistentList::combine_all(parts);
/// assert_eq!(joined, PersistentList::from_slice(&[1, 2, 3]));
/// ```
pub trait Monoid: Semigroup {
    /// The identity element of `combine`.
    fn empty() -> Self;

    /// Folds a sequence with `combine`, starting from [`empty`](Monoid::empty).
    fn combine_all<I>(iterator: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .fold(Self::empty(), |accumulator, element| {
                accumulator.combine(element)
            })
    }
}

impl<A: Add<Output = A> + Default> Monoid for Sum<A> {
    fn empty() -> Self {
        Self(A::default())
    }
}

macro_rules! product_monoid {
    ($($numeric:ty => $one:expr),* $(,)?) => {
        $(
            impl Monoid for Product<$numeric> {
                fn empty() -> Self {
                    Self($one)
                }
            }
        )*
    };
}

product_monoid!(
    i8 => 1, i16 => 1, i32 => 1, i64 => 1, i128 => 1, isize => 1,
    u8 => 1, u16 => 1, u32 => 1, u64 => 1, u128 => 1, usize => 1,
    f32 => 1.0, f64 => 1.0,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::{PersistentList, PersistentTreeSet};
    use rstest::rstest;

    #[rstest]
    fn numeric_identities() {
        assert_eq!(Sum::<i64>::empty(), Sum(0));
        assert_eq!(Product::<u8>::empty(), Product(1));
        assert_eq!(Sum::combine_all((1..=4).map(Sum)), Sum(10));
    }

    #[rstest]
    fn collection_identities() {
        let list: PersistentList<i32> = (1..=3).collect();
        assert_eq!(PersistentList::empty().combine(list.clone()), list);
        assert_eq!(list.clone().combine(PersistentList::empty()), list);

        let set: PersistentTreeSet<i32> = (1..=3).collect();
        assert_eq!(PersistentTreeSet::empty().combine(set.clone()), set);
        assert_eq!(set.clone().combine(PersistentTreeSet::empty()), set);
    }

    #[rstest]
    fn combine_all_of_sets_is_union() {
        let sets = [vec![3, 1], vec![2], vec![1, 4]]
            .into_iter()
            .map(|elements| elements.into_iter().collect::<PersistentTreeSet<i32>>());
        let union = PersistentTreeSet::combine_all(sets);
        assert_eq!(union.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
