//! Memoized structural hash codes.
//!
//! Each collection folds the hashes of its elements, in iteration order,
//! into one `u64`:
//!
//! ```text
//! code = 0                                    if the collection is empty
//! code = fold(SEED, |acc, h| (acc ^ h) * PRIME) otherwise
//! ```
//!
//! where `h` is the [`FxHasher`] digest of one element (or of one key/value
//! pair for the map). The result is computed on first use and cached in the
//! collection handle; since collections are immutable it never goes stale.

use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use rustc_hash::FxHasher;

const SEED: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0100_0000_01b3;

/// Lazily computed hash code of an immutable collection.
///
/// Cloning a collection clones the cache, so versions that share a root also
/// share the computed code. Every derived version starts with an empty cache.
#[derive(Clone, Default)]
pub(crate) struct HashCache(OnceLock<u64>);

impl HashCache {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the cached code, computing it with `compute` the first time.
    #[inline]
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> u64) -> u64 {
        *self.0.get_or_init(compute)
    }
}

/// Hashes a single element with [`FxHasher`].
#[inline]
pub(crate) fn element_hash<T: Hash + ?Sized>(element: &T) -> u64 {
    let mut hasher = FxHasher::default();
    element.hash(&mut hasher);
    hasher.finish()
}

/// Folds per-element hashes into a collection hash code.
pub(crate) fn fold_hashes<I: IntoIterator<Item = u64>>(hashes: I) -> u64 {
    let mut hashes = hashes.into_iter().peekable();
    if hashes.peek().is_none() {
        return 0;
    }
    hashes.fold(SEED, |accumulator, hash| {
        (accumulator ^ hash).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_empty_fold_is_zero() {
        assert_eq!(fold_hashes(std::iter::empty()), 0);
    }

    #[rstest]
    fn test_fold_is_order_sensitive() {
        let forward = fold_hashes([1, 2, 3].iter().map(element_hash));
        let backward = fold_hashes([3, 2, 1].iter().map(element_hash));
        assert_ne!(forward, backward);
    }

    #[rstest]
    fn test_fold_is_deterministic() {
        let first = fold_hashes(["a", "b"].iter().map(element_hash));
        let second = fold_hashes(["a", "b"].iter().map(element_hash));
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_cache_computes_once() {
        let cache = HashCache::new();
        let mut calls = 0;
        let first = cache.get_or_compute(|| {
            calls += 1;
            42
        });
        let second = cache.get_or_compute(|| {
            calls += 1;
            7
        });
        assert_eq!((first, second, calls), (42, 42, 1));
    }
}
