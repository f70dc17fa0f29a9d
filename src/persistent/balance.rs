//! Balancing and structural primitives for the AVL trees.
//!
//! Everything here is a pure function from trees to a new tree. The same
//! functions serve the list (ordered by position) and the map and set
//! (ordered by key): none of them compares keys, they only rearrange nodes
//! while preserving in-order sequence.
//!
//! - [`balance`] and the four rotations restore the AVL invariant after a
//!   single insertion or removal below a node.
//! - [`join`] concatenates `left ++ [entry] ++ right` for trees of any
//!   heights in `O(|h(left) - h(right)|)`. It is the "insert a subtree"
//!   primitive that [`concat`], [`split_at`], [`skip`], [`take`], bulk
//!   insertion and filtering are built on.
//! - [`build`] makes a perfectly balanced tree from an exact-size sequence in
//!   `O(n)`.

use super::node::{Side, Tree};

// =============================================================================
// Rotations
// =============================================================================

/// Restores the AVL invariant at the root of `tree`.
///
/// Expects both subtrees to be valid AVL trees whose heights differ by at most
/// two, which is the situation after a single insertion, removal or join
/// step. A node that is already balanced is returned unchanged.
pub(crate) fn balance<K: Clone, V: Clone>(tree: Tree<K, V>) -> Tree<K, V> {
    let factor = tree.balance_factor();
    if (-1..=1).contains(&factor) {
        return tree;
    }
    match tree.node() {
        Some(node) if factor >= 2 => {
            if node.left.balance_factor() >= 0 {
                rotate_right(&tree)
            } else {
                double_rotate_right(&tree)
            }
        }
        Some(node) => {
            if node.right.balance_factor() <= 0 {
                rotate_left(&tree)
            } else {
                double_rotate_left(&tree)
            }
        }
        None => Tree::Empty,
    }
}

/// Lifts the left child into the root position.
///
/// ```text
///       n               l
///      / \             / \
///     l   c    =>     a   n
///    / \                 / \
///   a   b               b   c
/// ```
pub(crate) fn rotate_right<K: Clone, V: Clone>(tree: &Tree<K, V>) -> Tree<K, V> {
    let Some(node) = tree.node() else {
        return Tree::Empty;
    };
    let Some(pivot) = node.left.node() else {
        return tree.clone();
    };
    let lowered = Tree::make(
        node.key.clone(),
        node.value.clone(),
        pivot.right.clone(),
        node.right.clone(),
    );
    Tree::make(
        pivot.key.clone(),
        pivot.value.clone(),
        pivot.left.clone(),
        lowered,
    )
}

/// Lifts the right child into the root position (mirror of [`rotate_right`]).
pub(crate) fn rotate_left<K: Clone, V: Clone>(tree: &Tree<K, V>) -> Tree<K, V> {
    let Some(node) = tree.node() else {
        return Tree::Empty;
    };
    let Some(pivot) = node.right.node() else {
        return tree.clone();
    };
    let lowered = Tree::make(
        node.key.clone(),
        node.value.clone(),
        node.left.clone(),
        pivot.left.clone(),
    );
    Tree::make(
        pivot.key.clone(),
        pivot.value.clone(),
        lowered,
        pivot.right.clone(),
    )
}

/// Rotates the left child left, then the root right.
pub(crate) fn double_rotate_right<K: Clone, V: Clone>(tree: &Tree<K, V>) -> Tree<K, V> {
    let Some(node) = tree.node() else {
        return Tree::Empty;
    };
    rotate_right(&node.with_left(rotate_left(&node.left)))
}

/// Rotates the right child right, then the root left.
pub(crate) fn double_rotate_left<K: Clone, V: Clone>(tree: &Tree<K, V>) -> Tree<K, V> {
    let Some(node) = tree.node() else {
        return Tree::Empty;
    };
    rotate_left(&node.with_right(rotate_right(&node.right)))
}

// =============================================================================
// Join, Concatenation and Splitting
// =============================================================================

/// Builds a balanced tree holding `left`, then `(key, value)`, then `right`.
///
/// Descends the spine of the taller tree until it meets a subtree of
/// comparable height, attaches there and rebalances on the way back up.
pub(crate) fn join<K: Clone, V: Clone>(
    left: &Tree<K, V>,
    key: K,
    value: V,
    right: &Tree<K, V>,
) -> Tree<K, V> {
    let left_height = left.height();
    let right_height = right.height();
    if left_height > right_height + 1
        && let Some(node) = left.node()
    {
        return balance(node.with_right(join(&node.right, key, value, right)));
    }
    if right_height > left_height + 1
        && let Some(node) = right.node()
    {
        return balance(node.with_left(join(left, key, value, &node.left)));
    }
    Tree::make(key, value, left.clone(), right.clone())
}

/// Builds a balanced tree holding every entry of `left` followed by every
/// entry of `right`.
pub(crate) fn concat<K: Clone, V: Clone>(left: &Tree<K, V>, right: &Tree<K, V>) -> Tree<K, V> {
    if left.is_empty() {
        return right.clone();
    }
    match pop_edge(right, Side::Left) {
        Some((key, value, rest)) => join(left, key, value, &rest),
        None => left.clone(),
    }
}

/// Removes the outermost entry on `side`, returning it with the remaining tree.
pub(crate) fn pop_edge<K: Clone, V: Clone>(
    tree: &Tree<K, V>,
    side: Side,
) -> Option<(K, V, Tree<K, V>)> {
    let node = tree.node()?;
    let inner = node.child(side);
    if inner.is_empty() {
        let rest = node.child(side.opposite()).clone();
        return Some((node.key.clone(), node.value.clone(), rest));
    }
    let (key, value, rest) = pop_edge(inner, side)?;
    Some((key, value, balance(node.with_child(side, rest))))
}

/// Splits `tree` into its first `index` entries and the rest.
pub(crate) fn split_at<K: Clone, V: Clone>(
    tree: &Tree<K, V>,
    index: usize,
) -> (Tree<K, V>, Tree<K, V>) {
    if index == 0 {
        return (Tree::Empty, tree.clone());
    }
    let Some(node) = tree.node() else {
        return (Tree::Empty, Tree::Empty);
    };
    if index >= node.count {
        return (tree.clone(), Tree::Empty);
    }
    let before = node.left.count();
    if index <= before {
        let (head, tail) = split_at(&node.left, index);
        let tail = join(&tail, node.key.clone(), node.value.clone(), &node.right);
        (head, tail)
    } else {
        let (head, tail) = split_at(&node.right, index - before - 1);
        let head = join(&node.left, node.key.clone(), node.value.clone(), &head);
        (head, tail)
    }
}

/// Drops the first `amount` entries.
///
/// Whole left subtrees (and their parent) are discarded without being
/// visited; only the boundary subtree is descended into, so the cost is
/// `O(log n)` whatever `amount` is.
pub(crate) fn skip<K: Clone, V: Clone>(tree: &Tree<K, V>, amount: usize) -> Tree<K, V> {
    if amount == 0 {
        return tree.clone();
    }
    let Some(node) = tree.node() else {
        return Tree::Empty;
    };
    if amount >= node.count {
        return Tree::Empty;
    }
    let before = node.left.count();
    if amount > before {
        skip(&node.right, amount - before - 1)
    } else {
        join(
            &skip(&node.left, amount),
            node.key.clone(),
            node.value.clone(),
            &node.right,
        )
    }
}

/// Keeps only the first `amount` entries.
pub(crate) fn take<K: Clone, V: Clone>(tree: &Tree<K, V>, amount: usize) -> Tree<K, V> {
    let Some(node) = tree.node() else {
        return Tree::Empty;
    };
    if amount >= node.count {
        return tree.clone();
    }
    let before = node.left.count();
    if amount <= before {
        take(&node.left, amount)
    } else {
        join(
            &node.left,
            node.key.clone(),
            node.value.clone(),
            &take(&node.right, amount - before - 1),
        )
    }
}

/// Inserts every entry of `subtree` so that its first entry lands at `index`.
///
/// `index` must be at most `tree.count()`.
pub(crate) fn splice<K: Clone, V: Clone>(
    tree: &Tree<K, V>,
    index: usize,
    subtree: &Tree<K, V>,
) -> Tree<K, V> {
    if subtree.is_empty() {
        return tree.clone();
    }
    let (head, tail) = split_at(tree, index);
    concat(&concat(&head, subtree), &tail)
}

// =============================================================================
// Whole-tree Builders
// =============================================================================

/// Builds a perfectly balanced tree from the next `count` entries of
/// `entries`, taking the median of every subrange as its root.
///
/// Stops early (with a smaller but still valid tree) if `entries` runs dry.
pub(crate) fn build<K, V, I>(entries: &mut I, count: usize) -> Tree<K, V>
where
    I: Iterator<Item = (K, V)>,
{
    if count == 0 {
        return Tree::Empty;
    }
    let left_count = count / 2;
    let left = build(entries, left_count);
    let Some((key, value)) = entries.next() else {
        return left;
    };
    let right = build(entries, count - left_count - 1);
    Tree::make(key, value, left, right)
}

/// Builds a balanced tree from a vector of entries in order.
pub(crate) fn build_from_vec<K, V>(entries: Vec<(K, V)>) -> Tree<K, V> {
    let count = entries.len();
    build(&mut entries.into_iter(), count)
}

/// Swaps the children of every node, reversing the in-order sequence.
///
/// Balance factors change sign, so the result is balanced whenever the input
/// is.
pub(crate) fn mirror<K: Clone, V: Clone>(tree: &Tree<K, V>) -> Tree<K, V> {
    match tree.node() {
        None => Tree::Empty,
        Some(node) => Tree::make(
            node.key.clone(),
            node.value.clone(),
            mirror(&node.right),
            mirror(&node.left),
        ),
    }
}

/// Rebuilds the tree with the same shape, transforming every entry in order.
pub(crate) fn map_entries<K, V, L, W, F>(tree: &Tree<K, V>, transform: &mut F) -> Tree<L, W>
where
    F: FnMut(&K, &V) -> (L, W),
{
    match tree.node() {
        None => Tree::Empty,
        Some(node) => {
            let left = map_entries(&node.left, transform);
            let (key, value) = transform(&node.key, &node.value);
            let right = map_entries(&node.right, transform);
            Tree::make(key, value, left, right)
        }
    }
}

/// Keeps the entries for which `predicate` holds, in order.
///
/// A rejected node is replaced by the concatenation of its filtered children,
/// and a kept node is re-joined over them, so the whole pass is `O(n)`.
/// Subtrees in which every entry is kept are shared with the input.
pub(crate) fn filter<K, V, P>(tree: &Tree<K, V>, predicate: &mut P) -> Tree<K, V>
where
    K: Clone,
    V: Clone,
    P: FnMut(&K, &V) -> bool,
{
    let Some(node) = tree.node() else {
        return Tree::Empty;
    };
    let left = filter(&node.left, predicate);
    let keep = predicate(&node.key, &node.value);
    let right = filter(&node.right, predicate);
    if !keep {
        return concat(&left, &right);
    }
    if left.ptr_eq(&node.left) && right.ptr_eq(&node.right) {
        return tree.clone();
    }
    join(&left, node.key.clone(), node.value.clone(), &right)
}

// =============================================================================
// Tests
// =============================================================================
