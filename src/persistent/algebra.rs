//! Set algebra on key-ordered trees.
//!
//! All operations are expressed with [`split_key`] and the `join` primitive:
//! split one tree around the root key of the other, recurse on both halves,
//! and join the results back together. Each runs in `O(m log(n / m + 1))`
//! for trees of sizes `m <= n`, and subtrees that come through unchanged are
//! shared with the inputs.
//!
//! Where both operands hold an entry for the same key, the entry of the left
//! operand is kept.

use std::cmp::Ordering;

use super::balance::{concat, join};
use super::comparator::Comparator;
use super::node::Tree;

/// Splits `tree` into the entries ordered before `key` and those ordered
/// after it, reporting whether an entry equal to `key` was present.
pub(crate) fn split_key<K, V, C>(
    tree: &Tree<K, V>,
    key: &K,
    comparator: &C,
) -> (Tree<K, V>, bool, Tree<K, V>)
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    let Some(node) = tree.node() else {
        return (Tree::Empty, false, Tree::Empty);
    };
    match comparator.compare(key, &node.key) {
        Ordering::Equal => (node.left.clone(), true, node.right.clone()),
        Ordering::Less => {
            let (before, found, after) = split_key(&node.left, key, comparator);
            let after = join(&after, node.key.clone(), node.value.clone(), &node.right);
            (before, found, after)
        }
        Ordering::Greater => {
            let (before, found, after) = split_key(&node.right, key, comparator);
            let before = join(&node.left, node.key.clone(), node.value.clone(), &before);
            (before, found, after)
        }
    }
}

/// Entries whose key occurs in either tree.
pub(crate) fn union<K, V, C>(left: &Tree<K, V>, right: &Tree<K, V>, comparator: &C) -> Tree<K, V>
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    if right.is_empty() || left.ptr_eq(right) {
        return left.clone();
    }
    let Some(node) = left.node() else {
        return right.clone();
    };
    let (before, _, after) = split_key(right, &node.key, comparator);
    join(
        &union(&node.left, &before, comparator),
        node.key.clone(),
        node.value.clone(),
        &union(&node.right, &after, comparator),
    )
}

/// Entries of `left` whose key also occurs in `right`.
pub(crate) fn intersection<K, V, C>(
    left: &Tree<K, V>,
    right: &Tree<K, V>,
    comparator: &C,
) -> Tree<K, V>
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    if left.ptr_eq(right) {
        return left.clone();
    }
    let Some(node) = left.node() else {
        return Tree::Empty;
    };
    if right.is_empty() {
        return Tree::Empty;
    }
    let (before, found, after) = split_key(right, &node.key, comparator);
    let lower = intersection(&node.left, &before, comparator);
    let upper = intersection(&node.right, &after, comparator);
    if found {
        join(&lower, node.key.clone(), node.value.clone(), &upper)
    } else {
        concat(&lower, &upper)
    }
}

/// Entries of `left` whose key does not occur in `right`.
pub(crate) fn difference<K, V, C>(
    left: &Tree<K, V>,
    right: &Tree<K, V>,
    comparator: &C,
) -> Tree<K, V>
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    if left.ptr_eq(right) {
        return Tree::Empty;
    }
    if right.is_empty() {
        return left.clone();
    }
    let Some(node) = left.node() else {
        return Tree::Empty;
    };
    let (before, found, after) = split_key(right, &node.key, comparator);
    let lower = difference(&node.left, &before, comparator);
    let upper = difference(&node.right, &after, comparator);
    if found {
        concat(&lower, &upper)
    } else {
        join(&lower, node.key.clone(), node.value.clone(), &upper)
    }
}

/// Entries whose key occurs in exactly one of the trees.
pub(crate) fn symmetric_difference<K, V, C>(
    left: &Tree<K, V>,
    right: &Tree<K, V>,
    comparator: &C,
) -> Tree<K, V>
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    union(
        &difference(left, right, comparator),
        &difference(right, left, comparator),
        comparator,
    )
}
