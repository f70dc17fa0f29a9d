//! Newtype wrappers selecting how numeric values combine.
//!
//! The same number can be combined by addition ([`Sum`]), multiplication
//! ([`Product`]) or by keeping the larger ([`Max`]) or smaller ([`Min`]) of
//! two values.

use std::fmt;

/// Combines by addition. The identity is `Sum(0)`.
///
/// ```rust
/// use arbors::persistent::PersistentTreeMap;
/// use arbors::typeclass::{Foldable, Sum};
///
/// let stock: PersistentTreeMap<&str, u32> = [("apples", 3), ("pears", 4)].into_iter().collect();
/// assert_eq!(stock.fold_map(Sum), Sum(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Sum<A>(pub A);

/// Combines by multiplication. The identity is `Product(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Product<A>(pub A);

/// Combines by keeping the larger value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Max<A>(pub A);

/// Combines by keeping the smaller value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Min<A>(pub A);

macro_rules! wrapper_common {
    ($($wrapper:ident),*) => {
        $(
            impl<A> $wrapper<A> {
                /// Wraps `value`.
                #[inline]
                pub const fn new(value: A) -> Self {
                    Self(value)
                }

                /// Unwraps the inner value.
                #[inline]
                pub fn into_inner(self) -> A {
                    self.0
                }
            }

            impl<A> From<A> for $wrapper<A> {
                fn from(value: A) -> Self {
                    Self(value)
                }
            }

            impl<A: fmt::Display> fmt::Display for $wrapper<A> {
                fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(formatter, "{}({})", stringify!($wrapper), self.0)
                }
            }
        )*
    };
}

wrapper_common!(Sum, Product, Max, Min);
