#![cfg(feature = "persistent")]
//! Unit tests for PersistentTreeSet.

use arbor::persistent::{Comparator, PersistentTreeSet, TreeMapError};
use arbor::typeclass::Foldable;
use proptest::prelude::*;
use rstest::rstest;

// =============================================================================
// Basic Operations
// =============================================================================

#[rstest]
fn test_new_set_is_empty() {
    let set: PersistentTreeSet<String> = PersistentTreeSet::new();
    assert!(set.is_empty());
    assert_eq!(set.min(), None);
    assert_eq!(format!("{set}"), "{}");
}

#[rstest]
fn test_insert_remove_contains() {
    let set = PersistentTreeSet::new().insert("pear").insert("apple").insert("fig");
    assert!(set.contains(&"fig"));
    let smaller = set.remove(&"fig");
    assert!(!smaller.contains(&"fig"));
    assert!(set.contains(&"fig"));
    assert_eq!(format!("{smaller}"), "{apple, pear}");
}

#[rstest]
fn test_singleton_and_equality() {
    let single = PersistentTreeSet::singleton(5);
    let built: PersistentTreeSet<i32> = [5, 5, 5].into_iter().collect();
    assert_eq!(single, built);
    assert_eq!(single.equal(&built), Ok(true));
}

#[rstest]
#[case(vec![], "{}")]
#[case(vec![3], "{3}")]
#[case(vec![3, 1, 2, 1], "{1, 2, 3}")]
fn test_display(#[case] elements: Vec<i32>, #[case] expected: &str) {
    let set: PersistentTreeSet<i32> = elements.into_iter().collect();
    assert_eq!(format!("{set}"), expected);
}

// =============================================================================
// Ordered Access
// =============================================================================

#[rstest]
fn test_iteration_with_custom_comparator() {
    let by_length = Comparator::from_less_than(|left: &&str, right: &&str| left.len() < right.len());
    let set = ["ccc", "a", "bb", "dd"]
        .into_iter()
        .fold(PersistentTreeSet::with_comparator(by_length), |set, word| set.insert(word));
    // "dd" has the same length as "bb", so the first stored element is kept.
    let words: Vec<&str> = set.iter().copied().collect();
    assert_eq!(words, vec!["a", "bb", "ccc"]);
    assert_eq!(set.get(&"zz"), Some(&"bb"));
}

#[rstest]
fn test_seek_and_rank() {
    let set: PersistentTreeSet<u32> = (0..100).map(|value| value * 3).collect();
    assert_eq!(set.iter_from(&100).next(), Some(&102));
    assert_eq!(set.iter_rev_from(&100).next(), Some(&99));
    assert_eq!(set.get_index(10), Some(&30));
    assert_eq!(set.slice(98, 5), vec![&294, &297]);
}

#[rstest]
fn test_from_elements_sorted_flag() {
    let ok = PersistentTreeSet::from_elements(Comparator::natural(), 0..10, true).unwrap();
    assert_eq!(ok.len(), 10);
    let rejected = PersistentTreeSet::from_elements(Comparator::natural(), [0, 2, 1], true);
    assert!(matches!(
        rejected,
        Err(TreeMapError::InvalidInput { position: 2, .. })
    ));
}

// =============================================================================
// Set Algebra
// =============================================================================

#[rstest]
fn test_subset_with_empty_sets() {
    let empty: PersistentTreeSet<i32> = PersistentTreeSet::new();
    let some: PersistentTreeSet<i32> = [1].into_iter().collect();
    assert_eq!(empty.is_subset(&some), Ok(true));
    assert_eq!(some.is_subset(&empty), Ok(false));
}

#[rstest]
fn test_algebra_rejects_other_comparator() {
    let natural: PersistentTreeSet<i32> = [1, 2].into_iter().collect();
    let custom = PersistentTreeSet::with_comparator(Comparator::from_less_than(
        |left: &i32, right: &i32| left < right,
    ))
    .insert(1);
    assert_eq!(
        natural.intersection(&custom).err(),
        Some(TreeMapError::ComparatorMismatch {
            operation: "intersection"
        })
    );
    assert_eq!(
        natural.difference(&custom).err(),
        Some(TreeMapError::ComparatorMismatch {
            operation: "difference"
        })
    );
}

#[rstest]
fn test_foldable_right_fold_is_descending() {
    let set: PersistentTreeSet<char> = "persistent".chars().collect();
    let letters = set.fold_right(String::new(), |letter, mut accumulator| {
        accumulator.push(letter);
        accumulator
    });
    assert_eq!(letters, "tsrpnie");
}

proptest! {
    #[test]
    fn prop_set_algebra_agrees_with_btreeset(
        left in prop::collection::btree_set(0u8..64, 0..40),
        right in prop::collection::btree_set(0u8..64, 0..40)
    ) {
        let left_set: PersistentTreeSet<u8> = left.iter().copied().collect();
        let right_set: PersistentTreeSet<u8> = right.iter().copied().collect();

        let union: Vec<u8> = left_set.union(&right_set).unwrap().iter().copied().collect();
        let expected: Vec<u8> = left.union(&right).copied().collect();
        prop_assert_eq!(union, expected);

        let intersection: Vec<u8> =
            left_set.intersection(&right_set).unwrap().iter().copied().collect();
        let expected: Vec<u8> = left.intersection(&right).copied().collect();
        prop_assert_eq!(intersection, expected);

        let difference: Vec<u8> =
            left_set.difference(&right_set).unwrap().iter().copied().collect();
        let expected: Vec<u8> = left.difference(&right).copied().collect();
        prop_assert_eq!(difference, expected);

        prop_assert_eq!(left_set.is_subset(&right_set), Ok(left.is_subset(&right)));
        prop_assert_eq!(left_set.is_disjoint(&right_set), Ok(left.is_disjoint(&right)));
        prop_assert_eq!(left_set.equal(&right_set), Ok(left == right));
    }
}
