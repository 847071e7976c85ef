//! O(n) construction of perfectly balanced trees from sorted entries.
//!
//! Every set-algebra result and every bulk constructor funnels through
//! [`PersistentTreeMap::from_sorted_vec`], so merging never pays for
//! incremental rebalancing.

use super::PersistentTreeMap;
use super::node::{Link, Node};
use crate::persistent::comparator::Comparator;
use crate::persistent::error::TreeMapError;
use std::cmp::Ordering;

/// Builds a balanced subtree from the next `count` entries by median split.
///
/// The left half takes `(count - 1) / 2` entries, the median becomes the
/// root and the right half takes the rest.
fn build_balanced<K, V, I>(count: usize, entries: &mut I) -> Link<K, V>
where
    I: Iterator<Item = (K, V)>,
{
    if count == 0 {
        return None;
    }
    let left_count = (count - 1) / 2;
    let left = build_balanced(left_count, entries);
    let (key, value) = entries.next()?;
    let right = build_balanced(count - 1 - left_count, entries);
    Node::branch(left, key, value, right).into_link()
}

/// Index of the first entry that does not sort strictly after its
/// predecessor.
fn first_out_of_order<K, V>(comparator: &Comparator<K>, entries: &[(K, V)]) -> Option<usize> {
    entries
        .windows(2)
        .position(|pair| !comparator.less_than(&pair[0].0, &pair[1].0))
        .map(|index| index + 1)
}

/// Collapses runs of equal keys in sorted entries.
///
/// The first key of a run is kept with the last value, which is what a
/// sequence of inserts would leave behind.
fn collapse_duplicates<K, V>(comparator: &Comparator<K>, entries: Vec<(K, V)>) -> Vec<(K, V)> {
    let mut collapsed: Vec<(K, V)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match collapsed.last_mut() {
            Some(last) if comparator.compare(&last.0, &key) == Ordering::Equal => last.1 = value,
            _ => collapsed.push((key, value)),
        }
    }
    collapsed
}

impl<K, V> PersistentTreeMap<K, V> {
    /// Builds a map from entries already strictly ascending under `comparator`.
    pub(super) fn from_sorted_vec(comparator: Comparator<K>, entries: Vec<(K, V)>) -> Self {
        let length = entries.len();
        log::trace!("bulk building a tree of {length} entries");
        let root = build_balanced(length, &mut entries.into_iter());
        debug_assert_eq!(super::node::size(&root), length);
        Self {
            root,
            length,
            comparator,
        }
    }

    /// Builds a perfectly balanced map from a sequence of entries in O(n).
    ///
    /// * `sorted == true`: the entries must already be strictly ascending
    ///   under `comparator`; otherwise the first offending entry is reported
    ///   as [`TreeMapError::InvalidInput`].
    /// * `sorted == false`: the entries are stable-sorted first (O(n log n))
    ///   and duplicate keys collapse to their last value, as if inserted one
    ///   by one.
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::InvalidInput`] when `sorted` is `true` and the
    /// keys are not strictly ascending.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::{Comparator, PersistentTreeMap, TreeMapError};
    ///
    /// let map = PersistentTreeMap::from_entries(
    ///     Comparator::natural(),
    ///     vec![(3, "c"), (1, "a"), (2, "b"), (1, "A")],
    ///     false,
    /// )
    /// .unwrap();
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.get(&1), Some(&"A"));
    ///
    /// let unsorted = PersistentTreeMap::from_entries(
    ///     Comparator::natural(),
    ///     vec![(1, "a"), (3, "c"), (2, "b")],
    ///     true,
    /// );
    /// assert!(matches!(unsorted, Err(TreeMapError::InvalidInput { position: 2, .. })));
    /// ```
    pub fn from_entries<I>(
        comparator: Comparator<K>,
        entries: I,
        sorted: bool,
    ) -> Result<Self, TreeMapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries: Vec<(K, V)> = entries.into_iter().collect();
        if sorted {
            if let Some(position) = first_out_of_order(&comparator, &entries) {
                log::debug!("rejecting bulk input: entry {position} is out of order");
                return Err(TreeMapError::InvalidInput {
                    position,
                    reason: "keys are not strictly ascending",
                });
            }
            return Ok(Self::from_sorted_vec(comparator, entries));
        }
        entries.sort_by(|left, right| comparator.compare(&left.0, &right.0));
        let entries = collapse_duplicates(&comparator, entries);
        Ok(Self::from_sorted_vec(comparator, entries))
    }
}

impl<K: Ord, V> PersistentTreeMap<K, V> {
    /// Builds a naturally ordered map from strictly ascending entries in O(n).
    ///
    /// # Errors
    ///
    /// Returns [`TreeMapError::InvalidInput`] when the keys are not strictly
    /// ascending.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::from_sorted_iter((0..1000).map(|key| (key, key * 2))).unwrap();
    /// assert_eq!(map.len(), 1000);
    /// assert_eq!(map.height(), 10);
    /// ```
    pub fn from_sorted_iter<I>(entries: I) -> Result<Self, TreeMapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_entries(Comparator::natural(), entries, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::treemap::node::{height, is_well_formed};
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(3, 2)]
    #[case(7, 3)]
    #[case(8, 4)]
    #[case(1023, 10)]
    #[case(1024, 11)]
    fn bulk_build_is_perfectly_balanced(#[case] count: i32, #[case] expected_height: usize) {
        let entries: Vec<(i32, ())> = (0..count).map(|key| (key, ())).collect();
        let map = PersistentTreeMap::from_sorted_vec(Comparator::natural(), entries);
        assert_eq!(height(&map.root), expected_height);
        assert!(is_well_formed(&map.root, &map.comparator));
        assert_eq!(map.len(), count as usize);
    }

    #[rstest]
    fn median_becomes_root() {
        let entries: Vec<(i32, ())> = (1..=5).map(|key| (key, ())).collect();
        let map = PersistentTreeMap::from_sorted_vec(Comparator::natural(), entries);
        assert_eq!(map.root.as_ref().map(|node| node.key), Some(3));
    }

    #[rstest]
    fn unsorted_entries_are_sorted_and_collapsed() {
        let map = PersistentTreeMap::from_entries(
            Comparator::natural(),
            vec![(5, 'e'), (1, 'a'), (5, 'E'), (3, 'c'), (1, 'A')],
            false,
        )
        .unwrap();
        let entries: Vec<(i32, char)> = map.iter().map(|(key, value)| (*key, *value)).collect();
        assert_eq!(entries, vec![(1, 'A'), (3, 'c'), (5, 'E')]);
        assert!(is_well_formed(&map.root, &map.comparator));
    }

    #[rstest]
    #[case(vec![(1, ()), (1, ())], 1)]
    #[case(vec![(1, ()), (2, ()), (0, ())], 2)]
    #[case(vec![(1, ()), (2, ()), (3, ()), (3, ())], 3)]
    fn sorted_flag_rejects_out_of_order(#[case] entries: Vec<(i32, ())>, #[case] position: usize) {
        let result = PersistentTreeMap::from_entries(Comparator::natural(), entries, true);
        assert_eq!(
            result.err(),
            Some(TreeMapError::InvalidInput {
                position,
                reason: "keys are not strictly ascending",
            })
        );
    }

    #[rstest]
    fn custom_comparator_orders_bulk_input() {
        let descending = Comparator::from_less_than(|left: &i32, right: &i32| left > right);
        let map = PersistentTreeMap::from_entries(descending, vec![(1, ()), (3, ()), (2, ())], false)
            .unwrap();
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![3, 2, 1]);
    }

    #[rstest]
    fn from_sorted_iter_uses_natural_order() {
        let map = PersistentTreeMap::from_sorted_iter(vec![(1, "a"), (2, "b")]).unwrap();
        assert!(map.comparator().is_natural());
        assert_eq!(map.get(&2), Some(&"b"));
    }
}
