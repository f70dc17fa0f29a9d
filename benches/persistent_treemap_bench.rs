//! Benchmark for PersistentTreeMap vs standard BTreeMap.

use arbors::persistent::PersistentTreeMap;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("treemap_insert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("PersistentTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = PersistentTreeMap::new();
                    for index in 0..size {
                        map = map.add_or_update(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for index in 0..size {
                    map.insert(black_box(index), black_box(index * 2));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// find Benchmark
// =============================================================================

fn benchmark_find(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("treemap_find");

    for size in [100, 1000, 10000] {
        let persistent_map: PersistentTreeMap<i32, i32> =
            (0..size).map(|index| (index, index * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = persistent_map.find(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for key in 0..size {
                    if let Some(&value) = standard_map.get(&black_box(key)) {
                        sum += value;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// range Benchmark
// =============================================================================

fn benchmark_range(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("treemap_range");

    let size = 100_000;
    let persistent_map: PersistentTreeMap<i32, i32> = (0..size).map(|index| (index, index)).collect();
    let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index)).collect();

    for width in [10, 1000] {
        group.bench_with_input(
            BenchmarkId::new("PersistentTreeMap", width),
            &width,
            |bencher, &width| {
                bencher.iter(|| {
                    let start = black_box(size / 2);
                    black_box(persistent_map.range(start..start + width).map(|(_, value)| *value).sum::<i32>())
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("BTreeMap", width), &width, |bencher, &width| {
            bencher.iter(|| {
                let start = black_box(size / 2);
                black_box(standard_map.range(start..start + width).map(|(_, value)| *value).sum::<i32>())
            });
        });
    }

    group.finish();
}

// =============================================================================
// set algebra Benchmark
// =============================================================================

fn benchmark_union(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("treemap_union");

    for size in [1000, 10000] {
        let left: PersistentTreeMap<i32, i32> = (0..size).map(|index| (index, index)).collect();
        let right: PersistentTreeMap<i32, i32> =
            (size / 2..size + size / 2).map(|index| (index, index)).collect();

        group.bench_with_input(BenchmarkId::new("PersistentTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| black_box(left.union(&right)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_find,
    benchmark_range,
    benchmark_union
);

criterion_main!(benches);
