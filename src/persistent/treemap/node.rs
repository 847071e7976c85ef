//! Node model and the size-biased rebalancing engine.
//!
//! Nodes are immutable once shared. Every structural change builds a new
//! node on the modified path and reuses the untouched subtrees.
//!
//! # Rebalancing rule
//!
//! After a subtree grows (or its sibling shrinks) the heavy side is
//! rotated up when one of its children holds more entries than the whole
//! light side. An outer grandchild takes a single rotation, an inner one a
//! double rotation:
//!
//! ```text
//! check_left_rotate(t):
//!     size(t.right.right) > size(t.left) => rotate_left(t)
//!     size(t.right.left)  > size(t.left) => rotate_left(t with rotate_right(t.right))
//! check_right_rotate(t):
//!     size(t.left.left)   > size(t.right) => rotate_right(t)
//!     size(t.left.right)  > size(t.right) => rotate_right(t with rotate_left(t.left))
//! ```
//!
//! Without the inner case, inserting keys alternately from both ends only
//! ever grows inner grandchildren and the tree degenerates into a path.

use super::super::ReferenceCounter;
use super::super::comparator::Comparator;
use std::cmp::Ordering;

/// A shared, non-empty subtree.
pub(super) type Shared<K, V> = ReferenceCounter<Node<K, V>>;

/// A possibly empty subtree.
pub(super) type Link<K, V> = Option<Shared<K, V>>;

/// Internal tree node.
#[derive(Clone)]
pub(super) struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    /// Number of entries in the subtree rooted here.
    pub(super) size: usize,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
}

/// Number of entries in a subtree. O(1).
#[inline]
pub(super) fn size<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

impl<K, V> Node<K, V> {
    /// Creates a node with no children.
    pub(super) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            size: 1,
            left: None,
            right: None,
        }
    }

    /// Creates a node over two subtrees, computing its size.
    pub(super) fn branch(left: Link<K, V>, key: K, value: V, right: Link<K, V>) -> Self {
        Self {
            size: 1 + size(&left) + size(&right),
            key,
            value,
            left,
            right,
        }
    }

    /// Wraps the node into a shared subtree.
    #[inline]
    pub(super) fn into_link(self) -> Link<K, V> {
        Some(ReferenceCounter::new(self))
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Copies this node with a new left subtree.
    pub(super) fn with_left(&self, left: Link<K, V>) -> Self {
        Self::branch(left, self.key.clone(), self.value.clone(), self.right.clone())
    }

    /// Copies this node with a new right subtree.
    pub(super) fn with_right(&self, right: Link<K, V>) -> Self {
        Self::branch(self.left.clone(), self.key.clone(), self.value.clone(), right)
    }

    /// Copies this node with a new value, keeping key and children.
    pub(super) fn with_value(&self, value: V) -> Self {
        Self {
            key: self.key.clone(),
            value,
            size: self.size,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

/// Takes a node out of its shared pointer, cloning only if it is shared.
#[inline]
fn take_node<K: Clone, V: Clone>(node: Shared<K, V>) -> Node<K, V> {
    ReferenceCounter::unwrap_or_clone(node)
}

// =============================================================================
// Rotations
// =============================================================================

/// `(a, x, (b, y, c))` becomes `((a, x, b), y, c)`.
pub(super) fn rotate_left<K: Clone, V: Clone>(node: Node<K, V>) -> Node<K, V> {
    let Node {
        key,
        value,
        left,
        right,
        ..
    } = node;
    match right {
        None => Node::branch(left, key, value, None),
        Some(right) => {
            let pivot = take_node(right);
            let lowered = Node::branch(left, key, value, pivot.left);
            Node::branch(lowered.into_link(), pivot.key, pivot.value, pivot.right)
        }
    }
}

/// `((a, x, b), y, c)` becomes `(a, x, (b, y, c))`.
pub(super) fn rotate_right<K: Clone, V: Clone>(node: Node<K, V>) -> Node<K, V> {
    let Node {
        key,
        value,
        left,
        right,
        ..
    } = node;
    match left {
        None => Node::branch(None, key, value, right),
        Some(left) => {
            let pivot = take_node(left);
            let lowered = Node::branch(pivot.right, key, value, right);
            Node::branch(pivot.left, pivot.key, pivot.value, lowered.into_link())
        }
    }
}

/// Rotates the right subtree up when either of its children outweighs the
/// left subtree.
pub(super) fn check_left_rotate<K: Clone, V: Clone>(node: Node<K, V>) -> Node<K, V> {
    let light = size(&node.left);
    let (outer, inner) = node
        .right
        .as_ref()
        .map_or((0, 0), |right| (size(&right.right), size(&right.left)));
    if outer > light {
        rotate_left(node)
    } else if inner > light {
        let Node {
            key,
            value,
            left,
            right,
            ..
        } = node;
        let raised = right.map(|right| ReferenceCounter::new(rotate_right(take_node(right))));
        rotate_left(Node::branch(left, key, value, raised))
    } else {
        node
    }
}

/// Rotates the left subtree up when either of its children outweighs the
/// right subtree.
pub(super) fn check_right_rotate<K: Clone, V: Clone>(node: Node<K, V>) -> Node<K, V> {
    let light = size(&node.right);
    let (outer, inner) = node
        .left
        .as_ref()
        .map_or((0, 0), |left| (size(&left.left), size(&left.right)));
    if outer > light {
        rotate_right(node)
    } else if inner > light {
        let Node {
            key,
            value,
            left,
            right,
            ..
        } = node;
        let raised = left.map(|left| ReferenceCounter::new(rotate_left(take_node(left))));
        rotate_right(Node::branch(raised, key, value, right))
    } else {
        node
    }
}

// =============================================================================
// Read-only walks
// =============================================================================

/// Comparator-driven search.
pub(super) fn find<'a, K, V>(
    mut link: Option<&'a Shared<K, V>>,
    comparator: &Comparator<K>,
    key: &K,
) -> Option<&'a Node<K, V>> {
    while let Some(node) = link {
        link = match comparator.compare(key, &node.key) {
            Ordering::Less => node.left.as_ref(),
            Ordering::Greater => node.right.as_ref(),
            Ordering::Equal => return Some(node),
        };
    }
    None
}

/// Leftmost node of a non-empty subtree.
pub(super) fn leftmost<K, V>(node: &Node<K, V>) -> &Node<K, V> {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    current
}

/// Rightmost node of a non-empty subtree.
pub(super) fn rightmost<K, V>(node: &Node<K, V>) -> &Node<K, V> {
    let mut current = node;
    while let Some(right) = current.right.as_deref() {
        current = right;
    }
    current
}

/// Node holding the entry of the given zero-based rank, skipping whole
/// subtrees by their cached size.
pub(super) fn select<K, V>(
    mut link: Option<&Shared<K, V>>,
    mut rank: usize,
) -> Option<&Node<K, V>> {
    while let Some(node) = link {
        let left_size = size(&node.left);
        match rank.cmp(&left_size) {
            Ordering::Less => link = node.left.as_ref(),
            Ordering::Equal => return Some(node),
            Ordering::Greater => {
                rank -= left_size + 1;
                link = node.right.as_ref();
            }
        }
    }
    None
}

/// Number of nodes on the longest root-to-leaf path.
pub(super) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref()
        .map_or(0, |node| 1 + height(&node.left).max(height(&node.right)))
}

/// Checks cached sizes and strict key ordering of a whole subtree.
#[cfg(test)]
pub(super) fn is_well_formed<K, V>(link: &Link<K, V>, comparator: &Comparator<K>) -> bool {
    fn walk<'a, K, V>(
        link: &'a Link<K, V>,
        comparator: &Comparator<K>,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
    ) -> Option<usize> {
        let Some(node) = link else {
            return Some(0);
        };
        if lower.is_some_and(|lower| !comparator.less_than(lower, &node.key)) {
            return None;
        }
        if upper.is_some_and(|upper| !comparator.less_than(&node.key, upper)) {
            return None;
        }
        let left = walk(&node.left, comparator, lower, Some(&node.key))?;
        let right = walk(&node.right, comparator, Some(&node.key), upper)?;
        (node.size == 1 + left + right).then_some(node.size)
    }
    walk(link, comparator, None, None).is_some()
}
