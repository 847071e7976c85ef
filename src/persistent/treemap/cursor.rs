//! Suspendable ordered traversal over a [`PersistentTreeMap`](super::PersistentTreeMap).
//!
//! A [`Cursor`] is a plain value describing where a traversal stands: a
//! direction and a stack of frames. Each frame is a node whose entry has
//! not been yielded yet; the top frame is always the next entry. Popping a
//! frame yields its entry and pushes the near spine of the subtree on its
//! far side (the right subtree when ascending, the left one when
//! descending).
//!
//! Because a cursor only borrows the immutable tree, cloning it forks the
//! traversal: both copies continue independently and produce the same
//! entries.
//!
//! # Examples
//!
//! ```rust
//! use arbor::persistent::{PersistentTreeMap, Step};
//!
//! let map: PersistentTreeMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
//!
//! let Step::Item(key, value, rest) = map.cursor() else {
//!     unreachable!()
//! };
//! assert_eq!((key, value), (&1, &'a'));
//!
//! // Forking: both copies see the same remainder.
//! let fork = rest.clone();
//! assert_eq!(rest.collect::<Vec<_>>(), fork.collect::<Vec<_>>());
//! ```

use super::node::{Node, size};
use crate::persistent::comparator::Comparator;
use smallvec::SmallVec;
use std::fmt;
use std::iter::FusedIterator;

/// Frames kept inline before the stack spills to the heap.
const INLINE_FRAMES: usize = 24;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Direction {
    Ascending,
    Descending,
}

/// Resumable traversal state over a persistent ordered map.
///
/// Obtain one from [`PersistentTreeMap::cursor`](super::PersistentTreeMap::cursor),
/// [`cursor_rev`](super::PersistentTreeMap::cursor_rev),
/// [`cursor_from`](super::PersistentTreeMap::cursor_from),
/// [`cursor_rev_from`](super::PersistentTreeMap::cursor_rev_from) or
/// [`cursor_at_rank`](super::PersistentTreeMap::cursor_at_rank); those
/// methods hand back the first [`Step`] directly.
///
/// A cursor is also an [`Iterator`] over `(&K, &V)`.
pub struct Cursor<'a, K, V> {
    direction: Direction,
    frames: SmallVec<[&'a Node<K, V>; INLINE_FRAMES]>,
    remaining: usize,
}

/// The result of advancing a [`Cursor`].
pub enum Step<'a, K, V> {
    /// The traversal is exhausted.
    End,
    /// The next entry, and a cursor over everything after it.
    Item(&'a K, &'a V, Cursor<'a, K, V>),
}

impl<'a, K, V> Cursor<'a, K, V> {
    fn empty(direction: Direction) -> Self {
        Self {
            direction,
            frames: SmallVec::new(),
            remaining: 0,
        }
    }

    /// Cursor over a whole subtree in ascending key order.
    pub(super) fn ascending(root: Option<&'a Node<K, V>>) -> Self {
        let mut cursor = Self::empty(Direction::Ascending);
        cursor.remaining = root.map_or(0, |node| node.size);
        cursor.push_spine(root);
        cursor
    }

    /// Cursor over a whole subtree in descending key order.
    pub(super) fn descending(root: Option<&'a Node<K, V>>) -> Self {
        let mut cursor = Self::empty(Direction::Descending);
        cursor.remaining = root.map_or(0, |node| node.size);
        cursor.push_spine(root);
        cursor
    }

    /// Ascending cursor starting at the first key not less than `key`.
    ///
    /// Left subtrees lying entirely below `key` are never pushed.
    pub(super) fn seek(
        root: Option<&'a Node<K, V>>,
        comparator: &Comparator<K>,
        key: &K,
    ) -> Self {
        let mut cursor = Self::empty(Direction::Ascending);
        let mut link = root;
        while let Some(node) = link {
            if comparator.less_than(&node.key, key) {
                link = node.right.as_deref();
            } else {
                cursor.remaining += 1 + size(&node.right);
                cursor.frames.push(node);
                link = node.left.as_deref();
            }
        }
        cursor
    }

    /// Descending cursor starting at the last key not greater than `key`.
    pub(super) fn seek_rev(
        root: Option<&'a Node<K, V>>,
        comparator: &Comparator<K>,
        key: &K,
    ) -> Self {
        let mut cursor = Self::empty(Direction::Descending);
        let mut link = root;
        while let Some(node) = link {
            if comparator.less_than(key, &node.key) {
                link = node.left.as_deref();
            } else {
                cursor.remaining += 1 + size(&node.left);
                cursor.frames.push(node);
                link = node.right.as_deref();
            }
        }
        cursor
    }

    /// Ascending cursor starting at the entry of zero-based rank `rank`.
    ///
    /// Whole subtrees before the rank are skipped using cached sizes.
    pub(super) fn at_rank(root: Option<&'a Node<K, V>>, mut rank: usize) -> Self {
        let mut cursor = Self::empty(Direction::Ascending);
        let mut link = root;
        while let Some(node) = link {
            let left_size = size(&node.left);
            if rank > left_size {
                rank -= left_size + 1;
                link = node.right.as_deref();
            } else {
                cursor.remaining += 1 + size(&node.right);
                cursor.frames.push(node);
                link = if rank == left_size {
                    None
                } else {
                    node.left.as_deref()
                };
            }
        }
        cursor
    }

    fn push_spine(&mut self, mut link: Option<&'a Node<K, V>>) {
        while let Some(node) = link {
            self.frames.push(node);
            link = match self.direction {
                Direction::Ascending => node.left.as_deref(),
                Direction::Descending => node.right.as_deref(),
            };
        }
    }

    /// Consumes the cursor and moves it one entry forward.
    ///
    /// Advancing a cursor that is at its end returns [`Step::End`] again.
    /// Clone the cursor first to keep the current position.
    #[must_use]
    pub fn advance(mut self) -> Step<'a, K, V> {
        match self.next() {
            Some((key, value)) => Step::Item(key, value, self),
            None => Step::End,
        }
    }

    /// Returns the entry the next advance will yield, without moving.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<(&'a K, &'a V)> {
        self.frames.last().map(|node| (&node.key, &node.value))
    }

    /// Returns `true` once every entry has been yielded.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns `true` for cursors walking from the largest key down.
    #[inline]
    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.direction == Direction::Descending
    }
}

impl<'a, K, V> Iterator for Cursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.frames.pop()?;
        let far_side = match self.direction {
            Direction::Ascending => node.right.as_deref(),
            Direction::Descending => node.left.as_deref(),
        };
        self.push_spine(far_side);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Cursor<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Cursor<'_, K, V> {}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            direction: self.direction,
            frames: self.frames.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Cursor")
            .field("direction", &self.direction)
            .field("next", &self.peek())
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl<'a, K, V> Step<'a, K, V> {
    /// Returns `true` for [`Step::End`].
    #[inline]
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Splits the step into its entry and the continuation cursor.
    #[must_use]
    pub fn into_item(self) -> Option<((&'a K, &'a V), Cursor<'a, K, V>)> {
        match self {
            Self::End => None,
            Self::Item(key, value, rest) => Some(((key, value), rest)),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Step<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End => formatter.write_str("End"),
            Self::Item(key, value, rest) => formatter
                .debug_tuple("Item")
                .field(key)
                .field(value)
                .field(rest)
                .finish(),
        }
    }
}
