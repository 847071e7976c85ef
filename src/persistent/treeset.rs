//! Persistent (immutable) ordered set.
//!
//! This module provides [`PersistentTreeSet`], an immutable ordered set
//! that uses [`PersistentTreeMap`] internally for efficient operations.
//!
//! # Overview
//!
//! `PersistentTreeSet` is a wrapper around `PersistentTreeMap<T, ()>` that
//! provides set operations like union, intersection and difference. They
//! merge both sets in one ascending pass, so they run in O(N + M).
//!
//! - O(log N) expected contains, insert, remove
//! - O(log N) min/max and rank lookup
//! - O(1) len and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use arbor::persistent::PersistentTreeSet;
//!
//! let set_a: PersistentTreeSet<i32> = [1, 2, 3].into_iter().collect();
//! let set_b: PersistentTreeSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! let union = set_a.union(&set_b).unwrap();               // {1, 2, 3, 4}
//! let intersection = set_a.intersection(&set_b).unwrap(); // {2, 3}
//! let difference = set_a.difference(&set_b).unwrap();     // {1}
//!
//! assert_eq!(format!("{union}"), "{1, 2, 3, 4}");
//! assert_eq!(format!("{intersection}"), "{2, 3}");
//! assert_eq!(format!("{difference}"), "{1}");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::ControlFlow;

use super::{Comparator, Cursor, PersistentTreeMap, TreeMapError};
use crate::typeclass::Foldable;

// =============================================================================
// PersistentTreeSet Definition
// =============================================================================

/// A persistent (immutable) ordered set based on [`PersistentTreeMap`].
///
/// # Examples
///
/// ```rust
/// use arbor::persistent::PersistentTreeSet;
///
/// let set = PersistentTreeSet::new().insert(3).insert(1).insert(2);
/// let elements: Vec<&i32> = set.iter().collect();
/// assert_eq!(elements, vec![&1, &2, &3]);
///
/// let smaller = set.remove(&2);
/// assert_eq!(set.len(), 3);     // Original unchanged
/// assert_eq!(smaller.len(), 2); // New version
/// ```
pub struct PersistentTreeSet<T> {
    inner: PersistentTreeMap<T, ()>,
}

impl<T> Clone for PersistentTreeSet<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Ord> PersistentTreeSet<T> {
    /// Creates a new empty set ordered by `T`'s `Ord` implementation.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: PersistentTreeMap::new(),
        }
    }
}

impl<T> PersistentTreeSet<T> {
    /// Creates a new empty set ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: Comparator<T>) -> Self {
        Self {
            inner: PersistentTreeMap::with_comparator(comparator),
        }
    }

    /// Builds a balanced set from a sequence of elements in O(n).
    ///
    /// See [`PersistentTreeMap::from_entries`]; duplicates in unsorted input
    /// keep their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::InvalidInput`] when `sorted` is `true` and the
    /// elements are not strictly ascending.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::{Comparator, PersistentTreeSet};
    ///
    /// let set = PersistentTreeSet::from_elements(Comparator::natural(), vec![3, 1, 3, 2], false)
    ///     .unwrap();
    /// assert_eq!(format!("{set}"), "{1, 2, 3}");
    /// ```
    pub fn from_elements<I>(
        comparator: Comparator<T>,
        elements: I,
        sorted: bool,
    ) -> Result<Self, TreeMapError>
    where
        I: IntoIterator<Item = T>,
    {
        let entries = elements.into_iter().map(|element| (element, ()));
        PersistentTreeMap::from_entries(comparator, entries, sorted).map(|inner| Self { inner })
    }

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the comparator ordering this set.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &Comparator<T> {
        self.inner.comparator()
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        self.inner.height()
    }

    /// Returns `true` if the set contains an element equal to `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.inner.contains_key(element)
    }

    /// Returns the stored element equal to `element`.
    #[must_use]
    pub fn get(&self, element: &T) -> Option<&T> {
        self.inner.get_key_value(element).map(|(stored, ())| stored)
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.inner.min().map(|(element, ())| element)
    }

    /// Returns the largest element.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.inner.max().map(|(element, ())| element)
    }

    /// Returns the element at zero-based position `rank`.
    #[must_use]
    pub fn get_index(&self, rank: usize) -> Option<&T> {
        self.inner.get_index(rank).map(|(element, ())| element)
    }

    /// Returns up to `amount` elements starting at position `start`.
    #[must_use]
    pub fn slice(&self, start: usize, amount: usize) -> Vec<&T> {
        self.iter_at_rank(start).take(amount).collect()
    }

    /// Returns an iterator over elements in ascending order.
    #[must_use]
    pub fn iter(&self) -> PersistentTreeSetIterator<'_, T> {
        PersistentTreeSetIterator {
            cursor: self.inner.iter(),
        }
    }

    /// Returns an iterator over elements in descending order.
    #[must_use]
    pub fn iter_rev(&self) -> PersistentTreeSetIterator<'_, T> {
        PersistentTreeSetIterator {
            cursor: self.inner.iter_rev(),
        }
    }

    /// Returns an ascending iterator starting at the first element not less
    /// than `element`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = [10, 20, 30].into_iter().collect();
    /// let tail: Vec<&i32> = set.iter_from(&15).collect();
    /// assert_eq!(tail, vec![&20, &30]);
    /// ```
    #[must_use]
    pub fn iter_from(&self, element: &T) -> PersistentTreeSetIterator<'_, T> {
        PersistentTreeSetIterator {
            cursor: self.inner.iter_from(element),
        }
    }

    /// Returns a descending iterator starting at the last element not
    /// greater than `element`.
    #[must_use]
    pub fn iter_rev_from(&self, element: &T) -> PersistentTreeSetIterator<'_, T> {
        PersistentTreeSetIterator {
            cursor: self.inner.iter_rev_from(element),
        }
    }

    /// Returns an ascending iterator starting at position `rank`.
    #[must_use]
    pub fn iter_at_rank(&self, rank: usize) -> PersistentTreeSetIterator<'_, T> {
        PersistentTreeSetIterator {
            cursor: self.inner.iter_at_rank(rank),
        }
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the sets are ordered
    /// by different comparators.
    pub fn is_subset(&self, other: &Self) -> Result<bool, TreeMapError> {
        self.inner.is_subset(&other.inner)
    }

    /// Returns `true` if both sets hold the same elements.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the sets are ordered
    /// by different comparators.
    pub fn equal(&self, other: &Self) -> Result<bool, TreeMapError> {
        self.inner.equal(&other.inner)
    }

    /// Returns `true` if the sets have no element in common.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the sets are ordered
    /// by different comparators.
    pub fn is_disjoint(&self, other: &Self) -> Result<bool, TreeMapError> {
        self.inner.is_disjoint(&other.inner)
    }
}

impl<T: Clone + Ord> PersistentTreeSet<T> {
    /// Creates a set containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }
}

impl<T: Clone> PersistentTreeSet<T> {
    /// Inserts an element into the set.
    ///
    /// If an equal element is already present, the stored element is kept.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            inner: self.inner.insert(element, ()),
        }
    }

    /// Removes an element from the set.
    #[must_use]
    pub fn remove(&self, element: &T) -> Self {
        Self {
            inner: self.inner.remove(element),
        }
    }

    /// Removes an element, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::KeyNotFound`] if the element is absent.
    pub fn try_remove(&self, element: &T) -> Result<Self, TreeMapError> {
        self.inner
            .try_remove(element)
            .map(|((), inner)| Self { inner })
    }

    /// Returns the union of two sets.
    ///
    /// For elements present in both sets, the element stored in `self` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the sets are ordered
    /// by different comparators.
    pub fn union(&self, other: &Self) -> Result<Self, TreeMapError> {
        self.inner
            .union(&other.inner)
            .map(|inner| Self { inner })
    }

    /// Returns the elements present in both sets, as stored in `self`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the sets are ordered
    /// by different comparators.
    pub fn intersection(&self, other: &Self) -> Result<Self, TreeMapError> {
        self.inner
            .intersection(&other.inner)
            .map(|inner| Self { inner })
    }

    /// Returns the elements of `self` that are not in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the sets are ordered
    /// by different comparators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeSet;
    ///
    /// let set_a: PersistentTreeSet<i32> = (1..=5).collect();
    /// let set_b: PersistentTreeSet<i32> = [2, 4, 6].into_iter().collect();
    /// let difference = set_a.difference(&set_b).unwrap();
    /// assert_eq!(difference.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
    /// ```
    pub fn difference(&self, other: &Self) -> Result<Self, TreeMapError> {
        self.inner
            .difference(&other.inner)
            .map(|inner| Self { inner })
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// An iterator over the elements of a [`PersistentTreeSet`].
///
/// Cloning the iterator forks the traversal.
pub struct PersistentTreeSetIterator<'a, T> {
    cursor: Cursor<'a, T, ()>,
}

impl<T> Clone for PersistentTreeSetIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
        }
    }
}

impl<'a, T> Iterator for PersistentTreeSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentTreeSetIterator<'_, T> {}

impl<T> FusedIterator for PersistentTreeSetIterator<'_, T> {}

/// An owning iterator over the elements of a [`PersistentTreeSet`].
pub struct PersistentTreeSetIntoIterator<T> {
    elements: std::vec::IntoIter<T>,
}

impl<T> Iterator for PersistentTreeSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentTreeSetIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T: Ord> Default for PersistentTreeSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> FromIterator<T> for PersistentTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, element| set.insert(element))
    }
}

impl<T: Clone> IntoIterator for PersistentTreeSet<T> {
    type Item = T;
    type IntoIter = PersistentTreeSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        let elements: Vec<T> = self.iter().cloned().collect();
        PersistentTreeSetIntoIterator {
            elements: elements.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentTreeSet<T> {
    type Item = &'a T;
    type IntoIter = PersistentTreeSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> PartialEq for PersistentTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Eq for PersistentTreeSet<T> {}

impl<T: Hash> Hash for PersistentTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T: Clone> Foldable for PersistentTreeSet<T> {
    type Item = T;

    fn fold_while<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, T) -> ControlFlow<B, B>,
    {
        let folded = self
            .iter()
            .try_fold(init, |accumulator, element| function(accumulator, element.clone()));
        match folded {
            ControlFlow::Continue(result) | ControlFlow::Break(result) => result,
        }
    }

    fn fold_right_while<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(T, B) -> ControlFlow<B, B>,
    {
        let folded = self
            .iter_rev()
            .try_fold(init, |accumulator, element| function(element.clone(), accumulator));
        match folded {
            ControlFlow::Continue(result) | ControlFlow::Break(result) => result,
        }
    }

    #[inline]
    fn length(&self) -> usize {
        self.len()
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreeSet<String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentTreeSet<String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentTreeSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentTreeSet<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let elements = <Vec<T> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(elements.into_iter().collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
