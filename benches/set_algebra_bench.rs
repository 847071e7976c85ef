//! Benchmark for merge-join set algebra.
//!
//! Compares linear merges of PersistentTreeMap/PersistentTreeSet against
//! the equivalent BTreeSet operations and against folding inserts.

use arbor::persistent::{PersistentTreeMap, PersistentTreeSet};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;
use std::hint::black_box;

const SIZES: [u32; 3] = [100, 1_000, 10_000];

/// Two sets overlapping in roughly a third of their elements.
fn overlapping(size: u32) -> (Vec<u32>, Vec<u32>) {
    let left = (0..size).map(|index| index * 3).collect();
    let right = (0..size).map(|index| index * 2 + size).collect();
    (left, right)
}

// =============================================================================
// union Benchmark
// =============================================================================

fn benchmark_union(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("union");

    for size in SIZES {
        let (left, right) = overlapping(size);
        let left_set: PersistentTreeSet<u32> = left.iter().copied().collect();
        let right_set: PersistentTreeSet<u32> = right.iter().copied().collect();
        let left_standard: BTreeSet<u32> = left.iter().copied().collect();
        let right_standard: BTreeSet<u32> = right.iter().copied().collect();

        group.bench_with_input(BenchmarkId::new("merge", size), &size, |bencher, _| {
            bencher.iter(|| black_box(left_set.union(black_box(&right_set))));
        });

        group.bench_with_input(BenchmarkId::new("fold_insert", size), &size, |bencher, _| {
            bencher.iter(|| {
                black_box(right_set.iter().fold(left_set.clone(), |set, element| set.insert(*element)))
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &size, |bencher, _| {
            bencher.iter(|| {
                black_box(left_standard.union(black_box(&right_standard)).copied().collect::<BTreeSet<u32>>())
            });
        });
    }

    group.finish();
}

// =============================================================================
// intersection and difference Benchmarks
// =============================================================================

fn benchmark_intersection(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("intersection");

    for size in SIZES {
        let (left, right) = overlapping(size);
        let left_map: PersistentTreeMap<u32, u32> = left.iter().map(|key| (*key, *key)).collect();
        let right_map: PersistentTreeMap<u32, u32> = right.iter().map(|key| (*key, *key)).collect();

        group.bench_with_input(BenchmarkId::new("intersection", size), &size, |bencher, _| {
            bencher.iter(|| black_box(left_map.intersection(black_box(&right_map))));
        });

        group.bench_with_input(BenchmarkId::new("difference", size), &size, |bencher, _| {
            bencher.iter(|| black_box(left_map.difference(black_box(&right_map))));
        });
    }

    group.finish();
}

// =============================================================================
// predicate Benchmarks
// =============================================================================

fn benchmark_predicates(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("predicates");

    for size in SIZES {
        let whole: PersistentTreeSet<u32> = (0..size).collect();
        let evens: PersistentTreeSet<u32> = (0..size).step_by(2).collect();
        let shifted: PersistentTreeSet<u32> = (size..size * 2).collect();

        group.bench_with_input(BenchmarkId::new("is_subset", size), &size, |bencher, _| {
            bencher.iter(|| black_box(evens.is_subset(black_box(&whole))));
        });

        group.bench_with_input(BenchmarkId::new("is_disjoint", size), &size, |bencher, _| {
            bencher.iter(|| black_box(whole.is_disjoint(black_box(&shifted))));
        });

        group.bench_with_input(BenchmarkId::new("equal", size), &size, |bencher, _| {
            let copy = whole.clone().insert(size * 4).remove(&(size * 4));
            bencher.iter(|| black_box(whole.equal(black_box(&copy))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_union,
    benchmark_intersection,
    benchmark_predicates
);

criterion_main!(benches);
