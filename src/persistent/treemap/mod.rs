//! Persistent (immutable) tree map based on a size-biased binary search tree.
//!
//! This module provides [`PersistentTreeMap`], an immutable ordered map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! Every node caches the size of its subtree. Insertions and deletions
//! rebuild only the path from the root to the touched node and rebalance
//! each level with a single or double rotation, chosen by comparing cached
//! sizes.
//!
//! - O(log N) expected get, insert, remove, min/max
//! - O(log N) rank lookup and seek
//! - O(N + M) union, intersection, difference, subset, equality, disjointness
//! - O(N) bulk construction from sorted entries
//! - O(1) len and `is_empty`
//!
//! All operations return new maps without modifying the original,
//! and structural sharing ensures memory efficiency.
//!
//! # Examples
//!
//! ```rust
//! use arbor::persistent::PersistentTreeMap;
//!
//! let map = PersistentTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Seek to the first key not less than 2
//! let tail: Vec<&i32> = map.iter_from(&2).map(|(key, _)| key).collect();
//! assert_eq!(tail, vec![&2, &3]);
//! ```
//!
//! # Custom Ordering
//!
//! ```rust
//! use arbor::persistent::{Comparator, PersistentTreeMap};
//!
//! let by_length = Comparator::from_less_than(|left: &String, right: &String| {
//!     left.len() < right.len()
//! });
//! let map = PersistentTreeMap::with_comparator(by_length)
//!     .insert("ccc".to_string(), 3)
//!     .insert("a".to_string(), 1)
//!     .insert("bb".to_string(), 2);
//!
//! let keys: Vec<&String> = map.keys().collect();
//! assert_eq!(keys, vec!["a", "bb", "ccc"]);
//! ```

mod algebra;
mod build;
mod cursor;
mod node;

pub use cursor::{Cursor, Step};

use super::comparator::Comparator;
use super::error::TreeMapError;
use crate::typeclass::Foldable;
use node::{Link, Node, check_left_rotate, check_right_rotate, find, leftmost, rightmost, select};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::ControlFlow;

// =============================================================================
// PersistentTreeMap Definition
// =============================================================================

/// A persistent (immutable) ordered map.
///
/// `PersistentTreeMap` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns.
///
/// Keys are ordered by the map's [`Comparator`], fixed when the empty map is
/// created and inherited by every map derived from it.
///
/// # Time Complexity
///
/// | Operation       | Complexity        |
/// |-----------------|-------------------|
/// | `new`           | O(1)              |
/// | `get`           | O(log N)          |
/// | `insert`        | O(log N)          |
/// | `remove`        | O(log N)          |
/// | `min`/`max`     | O(log N)          |
/// | `get_index`     | O(log N)          |
/// | `iter_from`     | O(log N) + O(1) per entry |
/// | `union` etc.    | O(N + M)          |
/// | `from_entries`  | O(N), O(N log N) unsorted |
/// | `len`           | O(1)              |
///
/// # Examples
///
/// ```rust
/// use arbor::persistent::PersistentTreeMap;
///
/// let map = PersistentTreeMap::singleton(42, "answer");
/// assert_eq!(map.get(&42), Some(&"answer"));
///
/// let removed = map.remove(&42);
/// assert!(removed.is_empty());
/// assert_eq!(map.len(), 1); // Original unchanged
/// ```
pub struct PersistentTreeMap<K, V> {
    /// Root node of the tree
    root: Link<K, V>,
    /// Number of entries
    length: usize,
    /// Key order shared by every version of this map
    comparator: Comparator<K>,
}

impl<K, V> Clone for PersistentTreeMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
            comparator: self.comparator.clone(),
        }
    }
}

impl<K: Ord, V> PersistentTreeMap<K, V> {
    /// Creates a new empty map ordered by `K`'s `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Comparator::natural())
    }
}

impl<K, V> PersistentTreeMap<K, V> {
    /// Creates a new empty map ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: Comparator<K>) -> Self {
        Self {
            root: None,
            length: 0,
            comparator,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the comparator ordering this map.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &Comparator<K> {
        &self.comparator
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// Never fails: a missing key yields `None`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert("hello", 42);
    /// assert_eq!(map.get(&"hello"), Some(&42));
    /// assert_eq!(map.get(&"world"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        find(self.root.as_ref(), &self.comparator, key).map(|node| &node.value)
    }

    /// Returns the stored key and value for a key equal to `key`.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        find(self.root.as_ref(), &self.comparator, key).map(|node| (&node.key, &node.value))
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns the value for `key`, or [`TreeMapError::KeyNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the key is absent.
    pub fn try_get(&self, key: &K) -> Result<&V, TreeMapError> {
        self.get(key).ok_or(TreeMapError::KeyNotFound)
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    ///
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// assert_eq!(map.max(), Some((&3, &"three")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root
            .as_deref()
            .map(leftmost)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the maximum key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root
            .as_deref()
            .map(rightmost)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the entry at zero-based position `rank` in key order.
    ///
    /// # Complexity
    ///
    /// O(log N), using cached subtree sizes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, i32> = (0..100).map(|key| (key * 10, key)).collect();
    /// assert_eq!(map.get_index(42), Some((&420, &42)));
    /// assert_eq!(map.get_index(100), None);
    /// ```
    #[must_use]
    pub fn get_index(&self, rank: usize) -> Option<(&K, &V)> {
        select(self.root.as_ref(), rank).map(|node| (&node.key, &node.value))
    }

    /// Returns up to `amount` entries starting at position `start`.
    ///
    /// Entries before `start` are skipped a whole subtree at a time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, char> =
    ///     [(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')].into_iter().collect();
    /// assert_eq!(map.slice(1, 2), vec![(&2, &'b'), (&3, &'c')]);
    /// assert_eq!(map.slice(3, 10), vec![(&4, &'d')]);
    /// assert!(map.slice(9, 1).is_empty());
    /// ```
    #[must_use]
    pub fn slice(&self, start: usize, amount: usize) -> Vec<(&K, &V)> {
        self.iter_at_rank(start).take(amount).collect()
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Returns the first step of an ascending traversal.
    pub fn cursor(&self) -> Step<'_, K, V> {
        self.iter().advance()
    }

    /// Returns the first step of a descending traversal.
    pub fn cursor_rev(&self) -> Step<'_, K, V> {
        self.iter_rev().advance()
    }

    /// Returns the first step of an ascending traversal starting at the
    /// first key not less than `key`.
    pub fn cursor_from(&self, key: &K) -> Step<'_, K, V> {
        self.iter_from(key).advance()
    }

    /// Returns the first step of a descending traversal starting at the
    /// last key not greater than `key`.
    pub fn cursor_rev_from(&self, key: &K) -> Step<'_, K, V> {
        self.iter_rev_from(key).advance()
    }

    /// Returns the first step of an ascending traversal starting at
    /// position `rank`.
    pub fn cursor_at_rank(&self, rank: usize) -> Step<'_, K, V> {
        self.iter_at_rank(rank).advance()
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    /// ```
    #[must_use]
    pub fn iter(&self) -> Cursor<'_, K, V> {
        Cursor::ascending(self.root.as_deref())
    }

    /// Returns an iterator over entries in descending key order.
    #[must_use]
    pub fn iter_rev(&self) -> Cursor<'_, K, V> {
        Cursor::descending(self.root.as_deref())
    }

    /// Returns an ascending iterator starting at the first key not less
    /// than `key`.
    ///
    /// # Complexity
    ///
    /// O(log N) to position, then O(1) amortized per entry.
    #[must_use]
    pub fn iter_from(&self, key: &K) -> Cursor<'_, K, V> {
        Cursor::seek(self.root.as_deref(), &self.comparator, key)
    }

    /// Returns a descending iterator starting at the last key not greater
    /// than `key`.
    #[must_use]
    pub fn iter_rev_from(&self, key: &K) -> Cursor<'_, K, V> {
        Cursor::seek_rev(self.root.as_deref(), &self.comparator, key)
    }

    /// Returns an ascending iterator starting at position `rank`.
    #[must_use]
    pub fn iter_at_rank(&self, rank: usize) -> Cursor<'_, K, V> {
        Cursor::at_rank(self.root.as_deref(), rank)
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + Clone {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + Clone {
        self.iter().map(|(_, value)| value)
    }
}

impl<K: Clone + Ord, V: Clone> PersistentTreeMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::singleton(42, "answer");
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }
}

impl<K: Clone, V: Clone> PersistentTreeMap<K, V> {
    // =========================================================================
    // Insert
    // =========================================================================

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains an equal key, its value is replaced and
    /// the stored key is kept.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map1 = PersistentTreeMap::new().insert(1, "one");
    /// let map2 = map1.insert(1, "ONE");
    ///
    /// assert_eq!(map1.get(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(map2.get(&1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let (new_root, added) =
            Self::insert_into_node(self.root.as_ref(), &self.comparator, key, value);
        Self {
            root: new_root.into_link(),
            length: if added { self.length + 1 } else { self.length },
            comparator: self.comparator.clone(),
        }
    }

    /// Recursive helper for insert.
    /// Returns (`new_node`, `was_added`) where `was_added` is true if a new entry was added.
    fn insert_into_node(
        node: Option<&node::Shared<K, V>>,
        comparator: &Comparator<K>,
        key: K,
        value: V,
    ) -> (Node<K, V>, bool) {
        let Some(node_ref) = node else {
            return (Node::leaf(key, value), true);
        };
        match comparator.compare(&key, &node_ref.key) {
            Ordering::Less => {
                let (new_left, added) =
                    Self::insert_into_node(node_ref.left.as_ref(), comparator, key, value);
                let rebuilt = node_ref.with_left(new_left.into_link());
                if added {
                    (check_right_rotate(rebuilt), true)
                } else {
                    (rebuilt, false)
                }
            }
            Ordering::Greater => {
                let (new_right, added) =
                    Self::insert_into_node(node_ref.right.as_ref(), comparator, key, value);
                let rebuilt = node_ref.with_right(new_right.into_link());
                if added {
                    (check_left_rotate(rebuilt), true)
                } else {
                    (rebuilt, false)
                }
            }
            Ordering::Equal => (node_ref.with_value(value), false),
        }
    }

    // =========================================================================
    // Remove
    // =========================================================================

    /// Removes a key from the map.
    ///
    /// Returns a new map without the key. If the key doesn't exist,
    /// returns a clone of the original map sharing its whole tree.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// let removed = map.remove(&1);
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        self.try_remove(key)
            .map_or_else(|_| self.clone(), |(_, removed)| removed)
    }

    /// Removes a key, returning its value together with the new map.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::{PersistentTreeMap, TreeMapError};
    ///
    /// let map = PersistentTreeMap::new().insert(1, "one");
    /// let (value, rest) = map.try_remove(&1).unwrap();
    /// assert_eq!(value, "one");
    /// assert!(rest.is_empty());
    /// assert_eq!(rest.try_remove(&1).err(), Some(TreeMapError::KeyNotFound));
    /// ```
    pub fn try_remove(&self, key: &K) -> Result<(V, Self), TreeMapError> {
        let (new_root, value) = Self::remove_from_node(self.root.as_ref(), &self.comparator, key)
            .ok_or(TreeMapError::KeyNotFound)?;
        let removed = Self {
            root: new_root,
            length: self.length - 1,
            comparator: self.comparator.clone(),
        };
        Ok((value, removed))
    }

    /// Recursive helper for remove.
    /// Returns `None` when the key is absent, so the caller can keep the
    /// original tree.
    fn remove_from_node(
        node: Option<&node::Shared<K, V>>,
        comparator: &Comparator<K>,
        key: &K,
    ) -> Option<(Link<K, V>, V)> {
        let node_ref = node?;
        match comparator.compare(key, &node_ref.key) {
            Ordering::Less => {
                let (new_left, value) =
                    Self::remove_from_node(node_ref.left.as_ref(), comparator, key)?;
                let rebuilt = check_left_rotate(node_ref.with_left(new_left));
                Some((rebuilt.into_link(), value))
            }
            Ordering::Greater => {
                let (new_right, value) =
                    Self::remove_from_node(node_ref.right.as_ref(), comparator, key)?;
                let rebuilt = check_right_rotate(node_ref.with_right(new_right));
                Some((rebuilt.into_link(), value))
            }
            Ordering::Equal => Some((Self::remove_root(node_ref), node_ref.value.clone())),
        }
    }

    /// Removes the root of a subtree.
    ///
    /// With two children the root is replaced by its in-order neighbour
    /// taken from the larger subtree.
    fn remove_root(node_ref: &Node<K, V>) -> Link<K, V> {
        match (&node_ref.left, &node_ref.right) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child.clone()),
            (Some(left), Some(right)) => {
                if left.size > right.size {
                    let (rest, key, value) = Self::remove_max(left);
                    let replaced = Node::branch(rest, key, value, node_ref.right.clone());
                    check_left_rotate(replaced).into_link()
                } else {
                    let (rest, key, value) = Self::remove_min(right);
                    let replaced = Node::branch(node_ref.left.clone(), key, value, rest);
                    check_right_rotate(replaced).into_link()
                }
            }
        }
    }

    /// Detaches the minimum entry of a non-empty subtree.
    fn remove_min(node_ref: &Node<K, V>) -> (Link<K, V>, K, V) {
        match &node_ref.left {
            None => (
                node_ref.right.clone(),
                node_ref.key.clone(),
                node_ref.value.clone(),
            ),
            Some(left) => {
                let (rest, key, value) = Self::remove_min(left);
                let rebuilt = check_left_rotate(node_ref.with_left(rest));
                (rebuilt.into_link(), key, value)
            }
        }
    }

    /// Detaches the maximum entry of a non-empty subtree.
    fn remove_max(node_ref: &Node<K, V>) -> (Link<K, V>, K, V) {
        match &node_ref.right {
            None => (
                node_ref.left.clone(),
                node_ref.key.clone(),
                node_ref.value.clone(),
            ),
            Some(right) => {
                let (rest, key, value) = Self::remove_max(right);
                let rebuilt = check_right_rotate(node_ref.with_right(rest));
                (rebuilt.into_link(), key, value)
            }
        }
    }

    // =========================================================================
    // Strict updates
    // =========================================================================

    /// Replaces the value of an existing key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the key is absent.
    pub fn try_replace(&self, key: &K, value: V) -> Result<Self, TreeMapError> {
        self.try_update(key, |_| value)
    }

    /// Replaces the value of an existing key with `function(old_value)`.
    ///
    /// The tree shape is unchanged; only the path to the key is copied.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert("visits", 1);
    /// let map = map.try_update(&"visits", |count| count + 1).unwrap();
    /// assert_eq!(map.get(&"visits"), Some(&2));
    /// assert!(map.try_update(&"other", |count| count + 1).is_err());
    /// ```
    pub fn try_update<F>(&self, key: &K, function: F) -> Result<Self, TreeMapError>
    where
        F: FnOnce(&V) -> V,
    {
        let new_root = Self::update_in_node(self.root.as_ref(), &self.comparator, key, function)
            .ok_or(TreeMapError::KeyNotFound)?;
        Ok(Self {
            root: new_root.into_link(),
            length: self.length,
            comparator: self.comparator.clone(),
        })
    }

    fn update_in_node<F>(
        node: Option<&node::Shared<K, V>>,
        comparator: &Comparator<K>,
        key: &K,
        function: F,
    ) -> Option<Node<K, V>>
    where
        F: FnOnce(&V) -> V,
    {
        let node_ref = node?;
        match comparator.compare(key, &node_ref.key) {
            Ordering::Less => {
                let new_left =
                    Self::update_in_node(node_ref.left.as_ref(), comparator, key, function)?;
                Some(node_ref.with_left(new_left.into_link()))
            }
            Ordering::Greater => {
                let new_right =
                    Self::update_in_node(node_ref.right.as_ref(), comparator, key, function)?;
                Some(node_ref.with_right(new_right.into_link()))
            }
            Ordering::Equal => Some(node_ref.with_value(function(&node_ref.value))),
        }
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over key-value pairs of a [`PersistentTreeMap`].
///
/// Entries are cloned out of the shared tree up front.
pub struct PersistentTreeMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for PersistentTreeMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for PersistentTreeMapIntoIterator<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapIntoIterator<K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K: Ord, V> Default for PersistentTreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a naturally ordered map by inserting each pair in turn; later
/// pairs overwrite earlier values for equal keys.
impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for PersistentTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

impl<K: Clone, V: Clone> IntoIterator for PersistentTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = PersistentTreeMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        PersistentTreeMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Cursor<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Maps are equal when [`PersistentTreeMap::equal`] holds; maps with
/// different comparators are never equal.
impl<K, V: PartialEq> PartialEq for PersistentTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other).unwrap_or(false)
    }
}

impl<K, V: Eq> Eq for PersistentTreeMap<K, V> {}

/// Hashes the length, then each (key, value) pair in key order, so equal
/// maps hash equally regardless of insertion order.
impl<K: Hash, V: Hash> Hash for PersistentTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

/// Renders entries in ascending order as `{key => value, ...}`.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for PersistentTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key} => {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<K: Clone, V: Clone> Foldable for PersistentTreeMap<K, V> {
    type Item = (K, V);

    fn fold_while<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, (K, V)) -> ControlFlow<B, B>,
    {
        let folded = self.iter().try_fold(init, |accumulator, (key, value)| {
            function(accumulator, (key.clone(), value.clone()))
        });
        match folded {
            ControlFlow::Continue(result) | ControlFlow::Break(result) => result,
        }
    }

    fn fold_right_while<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut((K, V), B) -> ControlFlow<B, B>,
    {
        let folded = self.iter_rev().try_fold(init, |accumulator, (key, value)| {
            function((key.clone(), value.clone()), accumulator)
        });
        match folded {
            ControlFlow::Continue(result) | ControlFlow::Break(result) => result,
        }
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

// =============================================================================
// Thread Safety
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreeMap<i32, String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentTreeMap<i32, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for PersistentTreeMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentTreeMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> PersistentTreeMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

/// Accepts a map, or a sequence of `[key, value]` pairs. Anything else in
/// the sequence is reported as a format error by the pair deserializer.
#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for PersistentTreeMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentTreeMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map or a sequence of key-value pairs")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = PersistentTreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut map = PersistentTreeMap::new();
        while let Some((key, value)) = access.next_element::<(K, V)>()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for PersistentTreeMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(PersistentTreeMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
