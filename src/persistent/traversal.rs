//! Stack-based in-order traversal with logarithmic seek.
//!
//! A [`Traversal`] walks a window of `length` consecutive entries starting at
//! in-order position `start`, in either [`Direction`]. Reverse traversal is
//! the same algorithm with the roles of the two children swapped: the
//! "backward" child of a node is its left child going forward and its right
//! child going in reverse.
//!
//! Seeking to `start` walks a single root-to-node path, comparing the offset
//! against the size of each backward child, and pushes only the nodes that
//! remain to be visited. It therefore costs `O(log n)` rather than `O(start)`.
//!
//! The traversal stack comes from a [`StackPool`] and is acquired lazily on
//! the first call to `next`. It goes back to the pool as soon as the window is
//! exhausted, or when the traversal is dropped.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use super::node::{Node, Side, Tree};
use super::pool::{PooledStack, StackPool};

// =============================================================================
// Direction
// =============================================================================

/// The order in which a traversal visits entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// First to last.
    #[default]
    Forward,
    /// Last to first.
    Reverse,
}

impl Direction {
    /// The other direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    /// The child holding entries visited before a node.
    const fn backward(self) -> Side {
        match self {
            Self::Forward => Side::Left,
            Self::Reverse => Side::Right,
        }
    }

    /// The child holding entries visited after a node.
    const fn forward(self) -> Side {
        self.backward().opposite()
    }
}

// =============================================================================
// Traversal
// =============================================================================

enum State<'a, K, V> {
    NotStarted {
        start: usize,
        remaining: usize,
    },
    InProgress {
        stack: PooledStack<'a, Node<K, V>>,
        remaining: usize,
    },
    Done,
}

/// An in-order iterator over the nodes of a tree.
pub(crate) struct Traversal<'a, K, V> {
    root: &'a Tree<K, V>,
    pool: &'a StackPool,
    direction: Direction,
    state: State<'a, K, V>,
}

impl<'a, K, V> Traversal<'a, K, V> {
    /// Visits every entry in `direction`, skipping the first `offset`.
    pub(crate) fn new(
        root: &'a Tree<K, V>,
        pool: &'a StackPool,
        direction: Direction,
        offset: usize,
    ) -> Self {
        let length = root.count().saturating_sub(offset);
        Self::window(root, pool, direction, offset, length)
    }

    /// Visits `length` entries in `direction`, starting at position `start`
    /// counted in that direction.
    ///
    /// The window is clipped to the end of the tree.
    pub(crate) fn window(
        root: &'a Tree<K, V>,
        pool: &'a StackPool,
        direction: Direction,
        start: usize,
        length: usize,
    ) -> Self {
        let remaining = length.min(root.count().saturating_sub(start));
        let state = if remaining == 0 {
            State::Done
        } else {
            State::NotStarted { start, remaining }
        };
        Self {
            root,
            pool,
            direction,
            state,
        }
    }

    /// Pushes the path to the node at `start`, leaving it on top.
    fn seek(&self, start: usize) -> PooledStack<'a, Node<K, V>> {
        let mut stack = PooledStack::acquire(self.pool);
        let backward = self.direction.backward();
        let forward = self.direction.forward();
        let mut offset = start;
        let mut current = self.root;
        while let Some(node) = current.node() {
            let before = node.child(backward).count();
            match offset.cmp(&before) {
                Ordering::Less => {
                    stack.push(node);
                    current = node.child(backward);
                }
                Ordering::Equal => {
                    stack.push(node);
                    break;
                }
                Ordering::Greater => {
                    offset -= before + 1;
                    current = node.child(forward);
                }
            }
        }
        stack
    }

    fn remaining(&self) -> usize {
        match &self.state {
            State::NotStarted { remaining, .. } | State::InProgress { remaining, .. } => *remaining,
            State::Done => 0,
        }
    }
}

/// Pushes `subtree` and its chain of backward descendants.
fn descend<'a, K, V>(
    direction: Direction,
    stack: &mut PooledStack<'a, Node<K, V>>,
    subtree: &'a Tree<K, V>,
) {
    let backward = direction.backward();
    let mut current = subtree;
    while let Some(node) = current.node() {
        stack.push(node);
        current = node.child(backward);
    }
}

impl<'a, K, V> Iterator for Traversal<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if let State::NotStarted { start, remaining } = self.state {
            let stack = self.seek(start);
            self.state = State::InProgress { stack, remaining };
        }
        let direction = self.direction;
        let State::InProgress { stack, remaining } = &mut self.state else {
            return None;
        };
        let Some(node) = stack.pop() else {
            self.state = State::Done;
            return None;
        };
        *remaining -= 1;
        if *remaining == 0 {
            // Dropping the stack hands it back to the pool.
            self.state = State::Done;
        } else {
            descend(direction, stack, node.child(direction.forward()));
        }
        Some(node)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for Traversal<'_, K, V> {}

impl<K, V> FusedIterator for Traversal<'_, K, V> {}

// =============================================================================
// Tests
// =============================================================================
