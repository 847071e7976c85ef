#![cfg(feature = "persistent")]
//! Randomized balance tests for PersistentTreeMap.
//!
//! Depth must stay within a small multiple of `log2(n)` for random, sorted,
//! zig-zag and churning workloads.

use arbor::persistent::{Comparator, PersistentTreeMap, PersistentTreeSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rstest::rstest;

/// Height allowed for a tree of `length` entries.
fn height_limit(length: usize) -> usize {
    let log2 = usize::BITS - length.leading_zeros();
    2 * log2 as usize + 2
}

// =============================================================================
// Insert-only Workloads
// =============================================================================

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
fn test_random_inserts_stay_shallow(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = PersistentTreeMap::new();
    for _ in 0..10_000 {
        let key: u64 = rng.r#gen();
        map = map.insert(key, ());
    }
    assert_eq!(map.len(), map.iter().count());
    assert!(
        map.height() <= height_limit(map.len()),
        "height {} for {} entries",
        map.height(),
        map.len()
    );
}

#[rstest]
fn test_ascending_inserts_stay_shallow() {
    let map = (0..10_000).fold(PersistentTreeMap::new(), |map, key| map.insert(key, key));
    assert!(map.height() <= height_limit(10_000));
}

#[rstest]
fn test_descending_inserts_stay_shallow() {
    let map = (0..10_000)
        .rev()
        .fold(PersistentTreeMap::new(), |map, key| map.insert(key, key));
    assert!(map.height() <= height_limit(10_000));
}

/// Keys taken alternately from both ends: 0, n-1, 1, n-2, ...
fn outside_in(length: i64) -> impl Iterator<Item = i64> {
    (0..length / 2).flat_map(move |index| [index, length - 1 - index])
}

/// Keys spreading outwards from the middle: m-1, m, m-2, m+1, ...
fn inside_out(length: i64) -> impl Iterator<Item = i64> {
    let middle = length / 2;
    (0..length / 2).flat_map(move |index| [middle - 1 - index, middle + index])
}

#[rstest]
#[case(10_000)]
#[case(20_000)]
fn test_outside_in_inserts_stay_shallow(#[case] length: i64) {
    let map = outside_in(length).fold(PersistentTreeMap::new(), |map, key| map.insert(key, key));
    assert!(map.keys().copied().eq(0..length));
    assert!(
        map.height() <= height_limit(map.len()),
        "height {} for {} entries",
        map.height(),
        map.len()
    );
}

#[rstest]
#[case(10_000)]
#[case(20_000)]
fn test_inside_out_inserts_stay_shallow(#[case] length: i64) {
    let map = inside_out(length).fold(PersistentTreeMap::new(), |map, key| map.insert(key, key));
    assert!(map.keys().copied().eq(0..length));
    assert!(
        map.height() <= height_limit(map.len()),
        "height {} for {} entries",
        map.height(),
        map.len()
    );
}

#[rstest]
fn test_outside_in_drain_stays_shallow() {
    let mut map = PersistentTreeMap::from_sorted_iter((0..10_000).map(|key| (key, ()))).unwrap();
    for (removed, key) in outside_in(10_000).take(9_800).enumerate() {
        map = map.remove(&key);
        if removed % 200 == 0 {
            assert!(map.height() <= height_limit(map.len()));
        }
    }
    assert_eq!(map.len(), 200);
    assert!(map.keys().copied().eq(4_900..5_100));
}

#[rstest]
fn test_custom_comparator_inserts_stay_shallow() {
    let reversed = Comparator::from_less_than(|left: &u32, right: &u32| left > right);
    let mut keys: Vec<u32> = (0..5_000).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(3));
    let set = keys
        .into_iter()
        .fold(PersistentTreeSet::with_comparator(reversed), |set, key| set.insert(key));
    assert_eq!(set.min(), Some(&4_999));
    assert!(set.height() <= height_limit(5_000));
}

// =============================================================================
// Churn Workloads
// =============================================================================

#[rstest]
#[case(11)]
#[case(2024)]
fn test_alternating_insert_delete_stays_shallow(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = PersistentTreeMap::new();
    let mut present = std::collections::BTreeSet::new();
    for step in 0..40_000 {
        let key: u16 = rng.gen_range(0..4_000);
        if rng.gen_bool(0.55) {
            map = map.insert(key, step);
            present.insert(key);
        } else {
            map = map.remove(&key);
            present.remove(&key);
        }
        if step % 500 == 0 {
            assert_eq!(map.len(), present.len());
            assert!(
                map.height() <= height_limit(map.len()),
                "step {step}: height {} for {} entries",
                map.height(),
                map.len()
            );
        }
    }
    assert!(map.keys().copied().eq(present.iter().copied()));
}

#[rstest]
fn test_drain_in_random_order_stays_shallow() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut map = PersistentTreeMap::from_sorted_iter((0..8_192).map(|key| (key, key))).unwrap();
    let mut keys: Vec<i32> = (0..8_192).collect();
    keys.shuffle(&mut rng);
    for (removed, key) in keys.iter().enumerate() {
        map = map.remove(key);
        if removed % 256 == 0 {
            assert!(map.height() <= height_limit(map.len()));
        }
    }
    assert!(map.is_empty());
}

#[rstest]
fn test_sliding_window_stays_shallow() {
    let mut map = PersistentTreeMap::new();
    for key in 0..20_000 {
        map = map.insert(key, ());
        if key >= 1_000 {
            map = map.remove(&(key - 1_000));
        }
    }
    assert_eq!(map.len(), 1_000);
    assert_eq!(map.min(), Some((&19_000, &())));
    assert!(map.height() <= height_limit(1_000));
}
