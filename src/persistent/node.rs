//! Immutable AVL tree nodes shared by every collection in this module.
//!
//! A tree is either [`Tree::Empty`] (the shared leaf sentinel) or a
//! reference-counted [`Node`]. Nodes are never mutated after construction;
//! an update builds new nodes along the path from the root to the change and
//! reuses every other subtree as-is.
//!
//! The same node type backs all three collections:
//!
//! - the position-ordered list stores its elements in `key` with `V = ()`,
//! - the key-ordered map stores keys and values,
//! - the key-ordered set stores its elements in `key` with `V = ()`.
//!
//! # Invariants
//!
//! For every node `n`:
//!
//! ```text
//! count(n)  == count(n.left) + count(n.right) + 1
//! height(n) == 1 + max(height(n.left), height(n.right))
//! height(n.left) - height(n.right) ∈ {-1, 0, 1}
//! ```
//!
//! The first two hold by construction ([`Tree::make`] derives them); the
//! third is restored by [`super::balance::balance`] after every update.

use std::cmp::Ordering;

use super::ReferenceCounter;
use crate::error::InvariantViolation;

// =============================================================================
// Side
// =============================================================================

/// One of the two children of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// =============================================================================
// Node and Tree
// =============================================================================

/// An interior node of an AVL tree.
pub(crate) struct Node<K, V> {
    /// Number of nodes in this subtree, this one included.
    pub(crate) count: usize,
    /// Length of the longest path from this node down to the sentinel.
    pub(crate) height: usize,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Tree<K, V>,
    pub(crate) right: Tree<K, V>,
}

/// A (possibly empty) AVL tree.
pub(crate) enum Tree<K, V> {
    /// The shared empty sentinel: `count == 0`, `height == 0`.
    Empty,
    Node(ReferenceCounter<Node<K, V>>),
}

impl<K, V> Clone for Tree<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Node(node) => Self::Node(ReferenceCounter::clone(node)),
        }
    }
}

impl<K, V> Default for Tree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::Empty
    }
}

impl<K, V> Node<K, V> {
    #[inline]
    pub(crate) const fn child(&self, side: Side) -> &Tree<K, V> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Copies this node with a new left subtree.
    #[inline]
    pub(crate) fn with_left(&self, left: Tree<K, V>) -> Tree<K, V> {
        Tree::make(
            self.key.clone(),
            self.value.clone(),
            left,
            self.right.clone(),
        )
    }

    /// Copies this node with a new right subtree.
    #[inline]
    pub(crate) fn with_right(&self, right: Tree<K, V>) -> Tree<K, V> {
        Tree::make(
            self.key.clone(),
            self.value.clone(),
            self.left.clone(),
            right,
        )
    }

    #[inline]
    pub(crate) fn with_child(&self, side: Side, subtree: Tree<K, V>) -> Tree<K, V> {
        match side {
            Side::Left => self.with_left(subtree),
            Side::Right => self.with_right(subtree),
        }
    }
}

impl<K, V> Tree<K, V> {
    /// Builds a node over two subtrees, deriving its count and height.
    ///
    /// The caller is responsible for the balance invariant; use
    /// [`super::balance::balance`] when the subtrees may differ in height by
    /// two.
    #[inline]
    pub(crate) fn make(key: K, value: V, left: Self, right: Self) -> Self {
        Self::Node(ReferenceCounter::new(Node {
            count: left.count() + right.count() + 1,
            height: left.height().max(right.height()) + 1,
            key,
            value,
            left,
            right,
        }))
    }

    #[inline]
    pub(crate) fn leaf(key: K, value: V) -> Self {
        Self::make(key, value, Self::Empty, Self::Empty)
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Node(node) => node.count,
        }
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Node(node) => node.height,
        }
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub(crate) fn node(&self) -> Option<&Node<K, V>> {
        match self {
            Self::Empty => None,
            Self::Node(node) => Some(&**node),
        }
    }

    /// `height(left) - height(right)`; zero for the sentinel.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn balance_factor(&self) -> isize {
        match self {
            Self::Empty => 0,
            Self::Node(node) => node.left.height() as isize - node.right.height() as isize,
        }
    }

    /// Returns `true` if both trees are the same allocation (or both empty).
    #[inline]
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Node(left), Self::Node(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// The node at in-order position `index`, if any.
    pub(crate) fn get(&self, mut index: usize) -> Option<&Node<K, V>> {
        let mut current = self;
        while let Self::Node(node) = current {
            let before = node.left.count();
            match index.cmp(&before) {
                Ordering::Less => current = &node.left,
                Ordering::Equal => return Some(&**node),
                Ordering::Greater => {
                    index -= before + 1;
                    current = &node.right;
                }
            }
        }
        None
    }

    /// The outermost node on `side` (the first or last in order).
    pub(crate) fn edge(&self, side: Side) -> Option<&Node<K, V>> {
        let mut current = self.node()?;
        while let Self::Node(next) = current.child(side) {
            current = &**next;
        }
        Some(current)
    }

    /// Verifies the count, height and balance invariants over the whole tree.
    pub(crate) fn check_structure(&self) -> Result<(), InvariantViolation> {
        self.check_from(0).map(|_| ())
    }

    /// Returns `(count, height)` of the verified subtree whose first element
    /// sits at in-order position `offset`.
    fn check_from(&self, offset: usize) -> Result<(usize, usize), InvariantViolation> {
        let Self::Node(node) = self else {
            return Ok((0, 0));
        };
        let (left_count, left_height) = node.left.check_from(offset)?;
        let position = offset + left_count;
        let (right_count, right_height) = node.right.check_from(position + 1)?;

        let actual_count = left_count + right_count + 1;
        if node.count != actual_count {
            return Err(InvariantViolation::CountMismatch {
                position,
                cached: node.count,
                actual: actual_count,
            });
        }
        let actual_height = left_height.max(right_height) + 1;
        if node.height != actual_height {
            return Err(InvariantViolation::HeightMismatch {
                position,
                cached: node.height,
                actual: actual_height,
            });
        }
        #[allow(clippy::cast_possible_wrap)]
        let balance_factor = left_height as isize - right_height as isize;
        if !(-1..=1).contains(&balance_factor) {
            return Err(InvariantViolation::Unbalanced {
                position,
                balance_factor,
            });
        }
        Ok((actual_count, actual_height))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn chain(keys: &[i32]) -> Tree<i32, ()> {
        // Deliberately degenerate: every node hangs off the right.
        keys.iter()
            .rev()
            .fold(Tree::Empty, |right, key| Tree::make(*key, (), Tree::Empty, right))
    }

    #[rstest]
    fn test_empty_sentinel_has_zero_count_and_height() {
        let tree: Tree<i32, ()> = Tree::Empty;
        assert_eq!(tree.count(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.is_empty());
        assert!(tree.node().is_none());
    }

    #[rstest]
    fn test_make_derives_count_and_height() {
        let left = Tree::leaf(1, ());
        let right = Tree::make(3, (), Tree::Empty, Tree::leaf(4, ()));
        let tree = Tree::make(2, (), left, right);
        assert_eq!(tree.count(), 4);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.balance_factor(), -1);
    }

    #[rstest]
    #[case(0, Some(1))]
    #[case(2, Some(3))]
    #[case(3, Some(4))]
    #[case(4, None)]
    fn test_get_by_position(#[case] index: usize, #[case] expected: Option<i32>) {
        let tree = Tree::make(
            2,
            (),
            Tree::leaf(1, ()),
            Tree::make(3, (), Tree::Empty, Tree::leaf(4, ())),
        );
        assert_eq!(tree.get(index).map(|node| node.key), expected);
    }

    #[rstest]
    fn test_edges() {
        let tree = chain(&[1, 2, 3]);
        assert_eq!(tree.edge(Side::Left).map(|node| node.key), Some(1));
        assert_eq!(tree.edge(Side::Right).map(|node| node.key), Some(3));
    }

    #[rstest]
    fn test_check_structure_accepts_balanced_tree() {
        let tree = Tree::make(2, (), Tree::leaf(1, ()), Tree::leaf(3, ()));
        assert_eq!(tree.check_structure(), Ok(()));
    }

    #[rstest]
    fn test_check_structure_reports_unbalanced_node() {
        let tree = chain(&[1, 2, 3]);
        assert_eq!(
            tree.check_structure(),
            Err(InvariantViolation::Unbalanced {
                position: 0,
                balance_factor: -2,
            })
        );
    }

    #[rstest]
    fn test_ptr_eq_tracks_sharing() {
        let tree = Tree::leaf(1, ());
        let shared = tree.clone();
        let rebuilt = Tree::leaf(1, ());
        assert!(tree.ptr_eq(&shared));
        assert!(!tree.ptr_eq(&rebuilt));
        assert!(Tree::<i32, ()>::Empty.ptr_eq(&Tree::Empty));
    }

    #[rstest]
    fn test_opposite_side() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }
}
