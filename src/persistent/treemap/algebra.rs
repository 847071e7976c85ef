//! Merge-join set algebra over two persistent ordered maps.
//!
//! Every operation walks both maps once with ascending cursors, comparing
//! the current keys and advancing whichever side is behind, so each runs
//! in O(n + m). Operations producing a map collect the merged entries into
//! a `Vec` and hand it to the bulk builder once.
//!
//! Both maps must carry the same [`Comparator`](crate::persistent::Comparator);
//! otherwise the operation fails with
//! [`TreeMapError::ComparatorMismatch`] before looking at any entry.

use super::PersistentTreeMap;
use super::cursor::Cursor;
use crate::persistent::error::TreeMapError;
use std::cmp::Ordering;

impl<K, V> PersistentTreeMap<K, V> {
    fn ensure_same_order(
        &self,
        other: &Self,
        operation: &'static str,
    ) -> Result<(), TreeMapError> {
        if self.comparator.same_as(&other.comparator) {
            Ok(())
        } else {
            log::debug!(
                "{operation} rejected: {:?} vs {:?}",
                self.comparator,
                other.comparator
            );
            Err(TreeMapError::ComparatorMismatch { operation })
        }
    }

    /// Compares the heads of two cursors.
    fn compare_heads(
        &self,
        left: &Cursor<'_, K, V>,
        right: &Cursor<'_, K, V>,
    ) -> Option<Ordering> {
        match (left.peek(), right.peek()) {
            (Some((left_key, _)), Some((right_key, _))) => {
                Some(self.comparator.compare(left_key, right_key))
            }
            _ => None,
        }
    }
}

impl<K: Clone, V: Clone> PersistentTreeMap<K, V> {
    /// Returns every entry of either map; on shared keys `self`'s stored key is
    /// kept and `other`'s value wins.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the maps are ordered
    /// by different comparators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let left: PersistentTreeMap<i32, &str> = [(1, "a"), (2, "b")].into_iter().collect();
    /// let right: PersistentTreeMap<i32, &str> = [(2, "B"), (3, "c")].into_iter().collect();
    ///
    /// let union = left.union(&right).unwrap();
    /// let entries: Vec<_> = union.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"a"), (&2, &"B"), (&3, &"c")]);
    /// ```
    pub fn union(&self, other: &Self) -> Result<Self, TreeMapError> {
        self.union_with(other, |_, _, other_value| other_value.clone())
    }

    /// Returns every entry of either map, resolving shared keys with
    /// `resolver(key, self_value, other_value)`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the maps are ordered
    /// by different comparators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let left: PersistentTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let right: PersistentTreeMap<&str, i32> = [("b", 10), ("c", 3)].into_iter().collect();
    ///
    /// let summed = left.union_with(&right, |_, left, right| left + right).unwrap();
    /// assert_eq!(summed.get(&"b"), Some(&12));
    /// ```
    pub fn union_with<F>(&self, other: &Self, mut resolver: F) -> Result<Self, TreeMapError>
    where
        F: FnMut(&K, &V, &V) -> V,
    {
        self.ensure_same_order(other, "union")?;
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.clone());
        }

        let mut left = self.iter();
        let mut right = other.iter();
        let mut merged = Vec::with_capacity(self.length + other.length);
        while let Some(ordering) = self.compare_heads(&left, &right) {
            match ordering {
                Ordering::Less => merged.extend(left.next().map(clone_entry)),
                Ordering::Greater => merged.extend(right.next().map(clone_entry)),
                Ordering::Equal => {
                    if let (Some((key, left_value)), Some((_, right_value))) =
                        (left.next(), right.next())
                    {
                        merged.push((key.clone(), resolver(key, left_value, right_value)));
                    }
                }
            }
        }
        merged.extend(left.map(clone_entry));
        merged.extend(right.map(clone_entry));
        Ok(Self::from_sorted_vec(self.comparator.clone(), merged))
    }

    /// Returns the entries whose keys are in both maps, taking `other`'s
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the maps are ordered
    /// by different comparators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let left: PersistentTreeMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    /// let right: PersistentTreeMap<i32, char> = [(2, 'B'), (4, 'D')].into_iter().collect();
    ///
    /// let common = left.intersection(&right).unwrap();
    /// assert_eq!(common.len(), 1);
    /// assert_eq!(common.get(&2), Some(&'B'));
    /// ```
    pub fn intersection(&self, other: &Self) -> Result<Self, TreeMapError> {
        self.intersection_with(other, |_, _, other_value| other_value.clone())
    }

    /// Returns the entries whose keys are in both maps, resolving values
    /// with `resolver(key, self_value, other_value)`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the maps are ordered
    /// by different comparators.
    pub fn intersection_with<F>(
        &self,
        other: &Self,
        mut resolver: F,
    ) -> Result<Self, TreeMapError>
    where
        F: FnMut(&K, &V, &V) -> V,
    {
        self.ensure_same_order(other, "intersection")?;

        let mut left = self.iter();
        let mut right = other.iter();
        let mut common = Vec::with_capacity(self.length.min(other.length));
        while let Some(ordering) = self.compare_heads(&left, &right) {
            match ordering {
                Ordering::Less => {
                    left.next();
                }
                Ordering::Greater => {
                    right.next();
                }
                Ordering::Equal => {
                    if let (Some((key, left_value)), Some((_, right_value))) =
                        (left.next(), right.next())
                    {
                        common.push((key.clone(), resolver(key, left_value, right_value)));
                    }
                }
            }
        }
        Ok(Self::from_sorted_vec(self.comparator.clone(), common))
    }

    /// Returns the entries of `self` whose keys are absent from `other`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the maps are ordered
    /// by different comparators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let left: PersistentTreeMap<i32, i32> = (1..=5).map(|key| (key, key)).collect();
    /// let right: PersistentTreeMap<i32, i32> = (3..=9).map(|key| (key, 0)).collect();
    ///
    /// let rest = left.difference(&right).unwrap();
    /// assert_eq!(rest.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    /// ```
    pub fn difference(&self, other: &Self) -> Result<Self, TreeMapError> {
        self.ensure_same_order(other, "difference")?;
        if self.is_empty() || other.is_empty() {
            return Ok(self.clone());
        }

        let mut left = self.iter();
        let mut right = other.iter();
        let mut remaining = Vec::with_capacity(self.length);
        while let Some(ordering) = self.compare_heads(&left, &right) {
            match ordering {
                Ordering::Less => remaining.extend(left.next().map(clone_entry)),
                Ordering::Greater => {
                    right.next();
                }
                Ordering::Equal => {
                    left.next();
                    right.next();
                }
            }
        }
        remaining.extend(left.map(clone_entry));
        Ok(Self::from_sorted_vec(self.comparator.clone(), remaining))
    }
}

impl<K, V: PartialEq> PersistentTreeMap<K, V> {
    /// Returns `true` if every entry of `self` is in `other` with an equal
    /// value.
    ///
    /// Walks both maps once and stops at the first entry of `self` that
    /// `other` lacks.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the maps are ordered
    /// by different comparators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let small: PersistentTreeMap<i32, char> = [(2, 'b')].into_iter().collect();
    /// let large: PersistentTreeMap<i32, char> = [(1, 'a'), (2, 'b')].into_iter().collect();
    /// let empty = PersistentTreeMap::new();
    ///
    /// assert_eq!(small.is_subset(&large), Ok(true));
    /// assert_eq!(large.is_subset(&small), Ok(false));
    /// assert_eq!(empty.is_subset(&small), Ok(true));
    /// ```
    pub fn is_subset(&self, other: &Self) -> Result<bool, TreeMapError> {
        self.ensure_same_order(other, "is_subset")?;
        if self.length > other.length {
            return Ok(false);
        }

        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            let (Some((left_key, left_value)), Some((right_key, right_value))) =
                (left.peek(), right.peek())
            else {
                return Ok(left.is_end());
            };
            match self.comparator.compare(left_key, right_key) {
                Ordering::Less => return Ok(false),
                Ordering::Greater => {
                    right.next();
                }
                Ordering::Equal => {
                    if left_value != right_value {
                        return Ok(false);
                    }
                    left.next();
                    right.next();
                }
            }
        }
    }

    /// Returns `true` if both maps hold equal keys with equal values.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the maps are ordered
    /// by different comparators.
    pub fn equal(&self, other: &Self) -> Result<bool, TreeMapError> {
        self.ensure_same_order(other, "equal")?;
        if self.length != other.length {
            return Ok(false);
        }

        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ok(true),
                (Some((left_key, left_value)), Some((right_key, right_value))) => {
                    if self.comparator.compare(left_key, right_key) != Ordering::Equal
                        || left_value != right_value
                    {
                        return Ok(false);
                    }
                }
                _ => return Ok(false),
            }
        }
    }
}

impl<K, V> PersistentTreeMap<K, V> {
    /// Returns `true` if the maps share no key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::ComparatorMismatch`] if the maps are ordered
    /// by different comparators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let odd: PersistentTreeMap<i32, ()> = [1, 3, 5].into_iter().map(|key| (key, ())).collect();
    /// let even: PersistentTreeMap<i32, ()> = [2, 4].into_iter().map(|key| (key, ())).collect();
    /// assert_eq!(odd.is_disjoint(&even), Ok(true));
    /// assert_eq!(odd.is_disjoint(&odd), Ok(false));
    /// ```
    pub fn is_disjoint(&self, other: &Self) -> Result<bool, TreeMapError> {
        self.ensure_same_order(other, "is_disjoint")?;

        let mut left = self.iter();
        let mut right = other.iter();
        while let Some(ordering) = self.compare_heads(&left, &right) {
            match ordering {
                Ordering::Less => {
                    left.next();
                }
                Ordering::Greater => {
                    right.next();
                }
                Ordering::Equal => return Ok(false),
            }
        }
        Ok(true)
    }
}

fn clone_entry<K: Clone, V: Clone>((key, value): (&K, &V)) -> (K, V) {
    (key.clone(), value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::Comparator;
    use crate::persistent::treemap::node::is_well_formed;
    use rstest::{fixture, rstest};

    fn map_of(entries: &[(i32, i32)]) -> PersistentTreeMap<i32, i32> {
        entries.iter().copied().collect()
    }

    #[fixture]
    fn evens() -> PersistentTreeMap<i32, i32> {
        (0..10).map(|key| (key * 2, key)).collect()
    }

    #[fixture]
    fn thirds() -> PersistentTreeMap<i32, i32> {
        (0..7).map(|key| (key * 3, -key)).collect()
    }

    #[rstest]
    fn union_merges_and_prefers_other(
        evens: PersistentTreeMap<i32, i32>,
        thirds: PersistentTreeMap<i32, i32>,
    ) {
        let union = evens.union(&thirds).unwrap();
        let keys: Vec<i32> = union.keys().copied().collect();
        assert_eq!(keys, vec![0, 2, 3, 4, 6, 8, 9, 10, 12, 14, 15, 16, 18]);
        assert_eq!(union.get(&6), Some(&-2));
        assert_eq!(union.get(&4), Some(&2));
        assert!(is_well_formed(&union.root, &union.comparator));
    }

    #[rstest]
    fn union_with_resolves_conflicts(
        evens: PersistentTreeMap<i32, i32>,
        thirds: PersistentTreeMap<i32, i32>,
    ) {
        let union = evens
            .union_with(&thirds, |key, left, right| key * 100 + left + right)
            .unwrap();
        assert_eq!(union.get(&12), Some(&(1200 + 6 - 4)));
    }

    #[rstest]
    fn union_with_empty_shares_structure(evens: PersistentTreeMap<i32, i32>) {
        let empty = PersistentTreeMap::new();
        let union = evens.union(&empty).unwrap();
        assert!(matches!(
            (&union.root, &evens.root),
            (Some(left), Some(right)) if crate::persistent::ReferenceCounter::ptr_eq(left, right)
        ));
        assert_eq!(empty.union(&evens).unwrap(), evens);
    }

    #[rstest]
    fn intersection_keeps_common_keys(
        evens: PersistentTreeMap<i32, i32>,
        thirds: PersistentTreeMap<i32, i32>,
    ) {
        let common = evens.intersection(&thirds).unwrap();
        let entries: Vec<(i32, i32)> = common.iter().map(|(key, value)| (*key, *value)).collect();
        assert_eq!(entries, vec![(0, 0), (6, -2), (12, -4), (18, -6)]);
    }

    #[rstest]
    fn intersection_with_uses_resolver(
        evens: PersistentTreeMap<i32, i32>,
        thirds: PersistentTreeMap<i32, i32>,
    ) {
        let common = evens
            .intersection_with(&thirds, |_, left, _| *left)
            .unwrap();
        assert_eq!(common.get(&18), Some(&9));
    }

    #[rstest]
    fn difference_removes_shared_keys(
        evens: PersistentTreeMap<i32, i32>,
        thirds: PersistentTreeMap<i32, i32>,
    ) {
        let rest = evens.difference(&thirds).unwrap();
        let keys: Vec<i32> = rest.keys().copied().collect();
        assert_eq!(keys, vec![2, 4, 8, 10, 14, 16]);
    }

    #[rstest]
    fn difference_without_overlap_is_unchanged() {
        let left = map_of(&(1..=7).map(|key| (key, key + 10)).collect::<Vec<_>>());
        let right = map_of(&(8..=14).map(|key| (key, key)).collect::<Vec<_>>());
        assert_eq!(left.difference(&right).unwrap(), left);
    }

    #[rstest]
    fn subset_requires_equal_values() {
        let small = map_of(&[(1, 1), (3, 3)]);
        let large = map_of(&[(1, 1), (2, 2), (3, 3)]);
        let changed = map_of(&[(1, 1), (2, 2), (3, 30)]);

        assert_eq!(small.is_subset(&large), Ok(true));
        assert_eq!(small.is_subset(&changed), Ok(false));
        assert_eq!(large.is_subset(&small), Ok(false));
    }

    #[rstest]
    fn subset_short_circuits_on_missing_key() {
        let left = map_of(&[(0, 0), (5, 5)]);
        let right = map_of(&[(1, 1), (5, 5), (9, 9)]);
        assert_eq!(left.is_subset(&right), Ok(false));
    }

    #[rstest]
    fn subset_with_empty_maps() {
        let empty = PersistentTreeMap::new();
        let non_empty = map_of(&[(1, 1)]);
        assert_eq!(empty.is_subset(&non_empty), Ok(true));
        assert_eq!(empty.is_subset(&empty), Ok(true));
        assert_eq!(non_empty.is_subset(&empty), Ok(false));
    }

    #[rstest]
    fn equal_compares_keys_and_values(evens: PersistentTreeMap<i32, i32>) {
        let rebuilt: PersistentTreeMap<i32, i32> = (0..10).rev().map(|key| (key * 2, key)).collect();
        assert_eq!(evens.equal(&rebuilt), Ok(true));
        assert_eq!(evens.equal(&rebuilt.insert(0, 99)), Ok(false));
        assert_eq!(evens.equal(&rebuilt.remove(&0)), Ok(false));
    }

    #[rstest]
    fn disjoint_detects_shared_key(
        evens: PersistentTreeMap<i32, i32>,
        thirds: PersistentTreeMap<i32, i32>,
    ) {
        assert_eq!(evens.is_disjoint(&thirds), Ok(false));
        let odds = map_of(&[(1, 1), (3, 3), (21, 21)]);
        assert_eq!(evens.is_disjoint(&odds), Ok(true));
        assert_eq!(evens.is_disjoint(&PersistentTreeMap::new()), Ok(true));
    }

    #[rstest]
    fn mismatched_comparators_fail_fast(evens: PersistentTreeMap<i32, i32>) {
        let descending = PersistentTreeMap::with_comparator(Comparator::from_less_than(
            |left: &i32, right: &i32| left > right,
        ))
        .insert(1, 1);

        let mismatch = |operation| TreeMapError::ComparatorMismatch { operation };
        assert_eq!(evens.union(&descending).err(), Some(mismatch("union")));
        assert_eq!(evens.intersection(&descending).err(), Some(mismatch("intersection")));
        assert_eq!(evens.difference(&descending).err(), Some(mismatch("difference")));
        assert_eq!(evens.is_subset(&descending), Err(mismatch("is_subset")));
        assert_eq!(evens.equal(&descending), Err(mismatch("equal")));
        assert_eq!(evens.is_disjoint(&descending), Err(mismatch("is_disjoint")));
    }

    #[rstest]
    fn shared_custom_comparator_allows_algebra() {
        let descending = Comparator::from_less_than(|left: &i32, right: &i32| left > right);
        let left = PersistentTreeMap::with_comparator(descending.clone())
            .insert(1, 'a')
            .insert(3, 'c');
        let right = PersistentTreeMap::with_comparator(descending)
            .insert(2, 'b')
            .insert(3, 'C');

        let union = left.union(&right).unwrap();
        let entries: Vec<(i32, char)> = union.iter().map(|(key, value)| (*key, *value)).collect();
        assert_eq!(entries, vec![(3, 'C'), (2, 'b'), (1, 'a')]);
    }
}
