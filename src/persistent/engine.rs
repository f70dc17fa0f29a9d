//! Path-copying search, insertion, removal and update.
//!
//! The algorithms are written once and parameterised by a [`Probe`], which
//! decides at each node whether the target lies to the left, at the node, or
//! to the right:
//!
//! - [`Position`] locates an existing element by index (the list);
//! - [`Gap`] locates the slot *before* an index, so it never stops at a node
//!   (list insertion);
//! - [`KeyProbe`] compares a key through a [`Comparator`] (the map and set).
//!
//! Every mutator copies only the nodes on the root-to-target path and
//! rebalances that path on the way back up.

use std::cmp::Ordering;
use std::ops::{Bound, Range};

use super::balance::{balance, pop_edge};
use super::comparator::Comparator;
use super::node::{Node, Side, Tree};

// =============================================================================
// Probes
// =============================================================================

/// Where the target lies relative to the node being examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Left,
    Here,
    Right,
}

/// A navigation strategy for descending a tree.
///
/// `step` is called once per level on the way down; probes that track a
/// relative position update it when they send the search right.
pub(crate) trait Probe<K, V> {
    fn step(&mut self, node: &Node<K, V>) -> Step;
}

/// Finds the element at an in-order index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Position(pub(crate) usize);

impl<K, V> Probe<K, V> for Position {
    #[inline]
    fn step(&mut self, node: &Node<K, V>) -> Step {
        let before = node.left.count();
        match self.0.cmp(&before) {
            Ordering::Less => Step::Left,
            Ordering::Equal => Step::Here,
            Ordering::Greater => {
                self.0 -= before + 1;
                Step::Right
            }
        }
    }
}

/// Finds the empty slot in front of an in-order index.
///
/// `Gap(0)` is before the first element and `Gap(count)` after the last.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Gap(pub(crate) usize);

impl<K, V> Probe<K, V> for Gap {
    #[inline]
    fn step(&mut self, node: &Node<K, V>) -> Step {
        let before = node.left.count();
        if self.0 <= before {
            Step::Left
        } else {
            self.0 -= before + 1;
            Step::Right
        }
    }
}

/// Finds a key by comparing it with node keys.
pub(crate) struct KeyProbe<'a, K, C> {
    key: &'a K,
    comparator: &'a C,
}

impl<'a, K, C> KeyProbe<'a, K, C> {
    #[inline]
    pub(crate) const fn new(key: &'a K, comparator: &'a C) -> Self {
        Self { key, comparator }
    }
}

impl<K, V, C: Comparator<K>> Probe<K, V> for KeyProbe<'_, K, C> {
    #[inline]
    fn step(&mut self, node: &Node<K, V>) -> Step {
        match self.comparator.compare(self.key, &node.key) {
            Ordering::Less => Step::Left,
            Ordering::Equal => Step::Here,
            Ordering::Greater => Step::Right,
        }
    }
}

// =============================================================================
// Search
// =============================================================================

/// Returns the node the probe stops at, if any.
pub(crate) fn find<'t, K, V, P: Probe<K, V>>(
    tree: &'t Tree<K, V>,
    probe: &mut P,
) -> Option<&'t Node<K, V>> {
    let mut current = tree;
    while let Some(node) = current.node() {
        match probe.step(node) {
            Step::Left => current = &node.left,
            Step::Here => return Some(node),
            Step::Right => current = &node.right,
        }
    }
    None
}

// =============================================================================
// Insertion
// =============================================================================

/// What to do when the probe stops at an existing node during insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Collision {
    /// Leave the tree alone and report [`Insertion::Occupied`].
    Keep,
    /// Replace the node's value, keeping its key and shape.
    Replace,
}

/// The outcome of [`insert`].
pub(crate) enum Insertion<K, V> {
    /// A new node was added; the tree grew by one.
    Added(Tree<K, V>),
    /// An existing node's value was replaced; the shape is unchanged.
    Replaced(Tree<K, V>),
    /// The target is occupied and the collision policy kept it.
    Occupied,
}

/// Inserts `(key, value)` where the probe leads.
pub(crate) fn insert<K, V, P>(
    tree: &Tree<K, V>,
    probe: &mut P,
    key: K,
    value: V,
    collision: Collision,
) -> Insertion<K, V>
where
    K: Clone,
    V: Clone,
    P: Probe<K, V>,
{
    let Some(node) = tree.node() else {
        return Insertion::Added(Tree::leaf(key, value));
    };
    let side = match probe.step(node) {
        Step::Left => Side::Left,
        Step::Right => Side::Right,
        Step::Here => {
            return match collision {
                Collision::Keep => Insertion::Occupied,
                Collision::Replace => Insertion::Replaced(Tree::make(
                    node.key.clone(),
                    value,
                    node.left.clone(),
                    node.right.clone(),
                )),
            };
        }
    };
    match insert(node.child(side), probe, key, value, collision) {
        Insertion::Added(child) => Insertion::Added(balance(node.with_child(side, child))),
        Insertion::Replaced(child) => Insertion::Replaced(node.with_child(side, child)),
        Insertion::Occupied => Insertion::Occupied,
    }
}

// =============================================================================
// Update
// =============================================================================

/// Replaces the entry the probe stops at with `transform(key, value)`.
///
/// Returns `None` if the probe never stops. The shape of the tree is left
/// untouched, so no rebalancing happens.
pub(crate) fn update<K, V, P, F>(tree: &Tree<K, V>, probe: &mut P, transform: F) -> Option<Tree<K, V>>
where
    K: Clone,
    V: Clone,
    P: Probe<K, V>,
    F: FnOnce(&K, &V) -> (K, V),
{
    let node = tree.node()?;
    match probe.step(node) {
        Step::Left => update(&node.left, probe, transform).map(|left| node.with_left(left)),
        Step::Right => update(&node.right, probe, transform).map(|right| node.with_right(right)),
        Step::Here => {
            let (key, value) = transform(&node.key, &node.value);
            Some(Tree::make(
                key,
                value,
                node.left.clone(),
                node.right.clone(),
            ))
        }
    }
}

// =============================================================================
// Removal
// =============================================================================

/// Removes the node the probe stops at.
///
/// Returns `None` if the probe never stops, leaving the caller free to decide
/// whether that is an error.
pub(crate) fn remove<K, V, P>(tree: &Tree<K, V>, probe: &mut P) -> Option<Tree<K, V>>
where
    K: Clone,
    V: Clone,
    P: Probe<K, V>,
{
    let node = tree.node()?;
    match probe.step(node) {
        Step::Left => remove(&node.left, probe).map(|left| balance(node.with_left(left))),
        Step::Right => remove(&node.right, probe).map(|right| balance(node.with_right(right))),
        Step::Here => Some(remove_node(node)),
    }
}

/// Splices `node` out of its subtree.
///
/// A node with two children is replaced by its in-order successor, which is
/// removed from the right subtree.
fn remove_node<K: Clone, V: Clone>(node: &Node<K, V>) -> Tree<K, V> {
    match (&node.left, &node.right) {
        (Tree::Empty, Tree::Empty) => Tree::Empty,
        (Tree::Empty, only) | (only, Tree::Empty) => only.clone(),
        (left, right) => match pop_edge(right, Side::Left) {
            Some((key, value, rest)) => balance(Tree::make(key, value, left.clone(), rest)),
            None => left.clone(),
        },
    }
}

// =============================================================================
// Ranks
// =============================================================================

/// Counts the entries ordered before `key`, plus any entry equal to it when
/// `inclusive` is set.
pub(crate) fn rank<K, V, C: Comparator<K>>(
    tree: &Tree<K, V>,
    key: &K,
    comparator: &C,
    inclusive: bool,
) -> usize {
    let mut rank = 0;
    let mut current = tree;
    while let Some(node) = current.node() {
        let goes_left = match comparator.compare(key, &node.key) {
            Ordering::Less => true,
            Ordering::Equal => !inclusive,
            Ordering::Greater => false,
        };
        if goes_left {
            current = &node.left;
        } else {
            rank += node.left.count() + 1;
            current = &node.right;
        }
    }
    rank
}

/// Translates key bounds into the half-open range of in-order positions they
/// select. An inverted pair of bounds selects nothing.
pub(crate) fn positions<K, V, C: Comparator<K>>(
    tree: &Tree<K, V>,
    lower: Bound<&K>,
    upper: Bound<&K>,
    comparator: &C,
) -> Range<usize> {
    let start = match lower {
        Bound::Included(key) => rank(tree, key, comparator, false),
        Bound::Excluded(key) => rank(tree, key, comparator, true),
        Bound::Unbounded => 0,
    };
    let end = match upper {
        Bound::Included(key) => rank(tree, key, comparator, true),
        Bound::Excluded(key) => rank(tree, key, comparator, false),
        Bound::Unbounded => tree.count(),
    };
    start..end.max(start)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::balance::build_from_vec;
    use crate::persistent::comparator::NaturalOrder;
    use rstest::rstest;

    fn keys<V>(tree: &Tree<i32, V>) -> Vec<i32> {
        (0..tree.count())
            .filter_map(|index| tree.get(index).map(|node| node.key))
            .collect()
    }

    fn from_range(range: std::ops::Range<i32>) -> Tree<i32, ()> {
        build_from_vec(range.map(|key| (key, ())).collect())
    }

    #[rstest]
    #[case(0, Some(10))]
    #[case(5, Some(15))]
    #[case(9, Some(19))]
    #[case(10, None)]
    fn test_find_by_position(#[case] index: usize, #[case] expected: Option<i32>) {
        let tree = from_range(10..20);
        assert_eq!(
            find(&tree, &mut Position(index)).map(|node| node.key),
            expected
        );
    }

    #[rstest]
    #[case(3, true)]
    #[case(42, false)]
    fn test_find_by_key(#[case] key: i32, #[case] found: bool) {
        let tree = from_range(0..10);
        let comparator = NaturalOrder;
        assert_eq!(
            find(&tree, &mut KeyProbe::new(&key, &comparator)).is_some(),
            found
        );
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(8)]
    fn test_insert_at_gap(#[case] index: usize) {
        let tree = from_range(0..8);
        let Insertion::Added(inserted) = insert(&tree, &mut Gap(index), 99, (), Collision::Keep)
        else {
            panic!("gap insertion must add a node");
        };
        let mut expected: Vec<i32> = (0..8).collect();
        expected.insert(index, 99);
        assert_eq!(keys(&inserted), expected);
        assert_eq!(inserted.check_structure(), Ok(()));
    }

    #[rstest]
    fn test_insert_by_key_collision_policies() {
        let comparator = NaturalOrder;
        let tree: Tree<i32, &str> = Tree::leaf(1, "one");

        let kept = insert(&tree, &mut KeyProbe::new(&1, &comparator), 1, "uno", Collision::Keep);
        assert!(matches!(kept, Insertion::Occupied));

        let Insertion::Replaced(replaced) =
            insert(&tree, &mut KeyProbe::new(&1, &comparator), 1, "uno", Collision::Replace)
        else {
            panic!("replace policy must replace");
        };
        assert_eq!(replaced.node().map(|node| node.value), Some("uno"));
        assert_eq!(tree.node().map(|node| node.value), Some("one"));
    }

    #[rstest]
    fn test_sequential_inserts_stay_balanced() {
        let comparator = NaturalOrder;
        let mut tree: Tree<i32, ()> = Tree::Empty;
        for key in 0..512 {
            if let Insertion::Added(next) =
                insert(&tree, &mut KeyProbe::new(&key, &comparator), key, (), Collision::Keep)
            {
                tree = next;
            }
            assert_eq!(tree.check_structure(), Ok(()));
        }
        assert_eq!(tree.count(), 512);
        assert!(tree.height() <= 10);
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(15)]
    #[case(31)]
    fn test_remove_by_position(#[case] index: usize) {
        let tree = from_range(0..32);
        let removed = remove(&tree, &mut Position(index)).unwrap();
        let mut expected: Vec<i32> = (0..32).collect();
        expected.remove(index);
        assert_eq!(keys(&removed), expected);
        assert_eq!(removed.check_structure(), Ok(()));
    }

    #[rstest]
    fn test_remove_missing_key_reports_none() {
        let tree = from_range(0..4);
        let comparator = NaturalOrder;
        assert!(remove(&tree, &mut KeyProbe::new(&9, &comparator)).is_none());
    }

    #[rstest]
    fn test_remove_everything_returns_to_sentinel() {
        let mut tree = from_range(0..100);
        while !tree.is_empty() {
            let middle = tree.count() / 2;
            tree = remove(&tree, &mut Position(middle)).unwrap();
            assert_eq!(tree.check_structure(), Ok(()));
        }
        assert!(tree.is_empty());
    }

    #[rstest]
    #[case(Bound::Included(3), Bound::Included(6), 3..7)]
    #[case(Bound::Excluded(3), Bound::Excluded(6), 4..6)]
    #[case(Bound::Unbounded, Bound::Excluded(2), 0..2)]
    #[case(Bound::Included(8), Bound::Unbounded, 8..10)]
    #[case(Bound::Included(7), Bound::Included(2), 7..7)]
    #[case(Bound::Included(-5), Bound::Included(50), 0..10)]
    fn test_positions_from_bounds(
        #[case] lower: Bound<i32>,
        #[case] upper: Bound<i32>,
        #[case] expected: Range<usize>,
    ) {
        let tree = from_range(0..10);
        assert_eq!(
            positions(&tree, lower.as_ref(), upper.as_ref(), &NaturalOrder),
            expected
        );
    }

    #[rstest]
    fn test_rank_of_absent_key() {
        let tree = build_from_vec(vec![(10, ()), (20, ()), (30, ())]);
        assert_eq!(rank(&tree, &25, &NaturalOrder, false), 2);
        assert_eq!(rank(&tree, &25, &NaturalOrder, true), 2);
        assert_eq!(rank(&tree, &20, &NaturalOrder, false), 1);
        assert_eq!(rank(&tree, &20, &NaturalOrder, true), 2);
    }

    #[rstest]
    fn test_update_keeps_shape() {
        let tree = from_range(0..16);
        let updated = update(&tree, &mut Position(3), |_, (): &()| (300, ())).unwrap();
        assert_eq!(updated.height(), tree.height());
        assert_eq!(updated.get(3).map(|node| node.key), Some(300));
        assert_eq!(tree.get(3).map(|node| node.key), Some(3));
        assert!(update(&tree, &mut Position(16), |_, (): &()| (0, ())).is_none());
    }
}
