//! Error types for the persistent collections.
//!
//! Strict operations (`at`, `insert`, `remove_at`, `set_item`, `add`,
//! `lookup`, ...) return [`CollectionResult`]. Every strict operation has a
//! non-failing sibling (`get`, `find`, `try_add`, `add_or_update`) that
//! callers should prefer when absence is an expected outcome.
//!
//! No operation partially applies a change: on error the original collection
//! is untouched, and on success a complete new version is returned.

use thiserror::Error;

/// Errors raised by strict collection operations.
///
/// # Examples
///
/// ```rust
/// use arbors::CollectionError;
/// use arbors::persistent::PersistentList;
///
/// let list: PersistentList<i32> = (1..=3).collect();
/// assert_eq!(
///     list.at(3),
///     Err(CollectionError::IndexOutOfRange { index: 3, length: 3 })
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CollectionError {
    /// A positional operation was given an index outside the valid range.
    ///
    /// Lookups, removals and updates accept `0..length`; insertions accept
    /// `0..=length`.
    #[error("index {index} is out of range for a collection of length {length}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the collection at the time of the call.
        length: usize,
    },

    /// A strict key accessor was given a key that is not present.
    #[error("key not found")]
    KeyNotFound,

    /// A strict `add` was given a key that is already present.
    #[error("key already exists")]
    DuplicateKey,
}

impl CollectionError {
    #[inline]
    pub(crate) const fn index_out_of_range(index: usize, length: usize) -> Self {
        Self::IndexOutOfRange { index, length }
    }
}

/// Result alias used by strict collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// A broken structural invariant found by `check_invariants`.
///
/// Positions are in-order positions of the offending node within the
/// collection, so they line up with indices of the list and with iteration
/// order of the map and set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvariantViolation {
    /// The heights of a node's subtrees differ by more than one.
    #[error("node at position {position} has balance factor {balance_factor}")]
    Unbalanced {
        /// In-order position of the node.
        position: usize,
        /// `height(left) - height(right)`.
        balance_factor: isize,
    },

    /// A node's cached subtree size disagrees with its children.
    #[error("node at position {position} caches count {cached} but its subtree holds {actual}")]
    CountMismatch {
        /// In-order position of the node.
        position: usize,
        /// The count stored in the node.
        cached: usize,
        /// `count(left) + count(right) + 1`.
        actual: usize,
    },

    /// A node's cached height disagrees with its children.
    #[error("node at position {position} caches height {cached} but its subtree is {actual} high")]
    HeightMismatch {
        /// In-order position of the node.
        position: usize,
        /// The height stored in the node.
        cached: usize,
        /// `1 + max(height(left), height(right))`.
        actual: usize,
    },

    /// Two neighbouring keys are not strictly ascending under the comparator.
    #[error("keys at positions {position} and {} are not strictly ascending", .position + 1)]
    OutOfOrder {
        /// In-order position of the first key of the pair.
        position: usize,
    },
}
