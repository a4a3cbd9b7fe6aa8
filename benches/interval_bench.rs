use std::hint::black_box;

use augmented_itree::{BalancedIntervalTree, Interval, IntervalTree};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::Rng;

const INTERVAL_COUNT: usize = 1000;
const MAX_VALUE: i32 = 100_000;

fn random_intervals(count: usize, max_value: i32) -> Vec<Interval<i32>> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let start = rng.random_range(0..max_value);
            Interval::new(start, start + rng.random_range(1..=1000))
        })
        .collect()
}

fn random_points(count: usize, max_value: i32) -> Vec<i32> {
    let mut rng = rand::rng();
    (0..count).map(|_| rng.random_range(0..max_value)).collect()
}

fn bench_build_tree(c: &mut Criterion) {
    let intervals = random_intervals(INTERVAL_COUNT, MAX_VALUE);

    c.bench_function("build_interval_tree", |b| {
        b.iter(|| {
            let mut tree = IntervalTree::new();
            for interval in &intervals {
                tree.insert(black_box(*interval));
            }
            tree
        })
    });

    c.bench_function("build_balanced_interval_tree", |b| {
        b.iter(|| {
            let mut tree = BalancedIntervalTree::new();
            for interval in &intervals {
                tree.insert(black_box(*interval));
            }
            tree
        })
    });
}

fn bench_query_points(c: &mut Criterion) {
    let intervals = random_intervals(INTERVAL_COUNT, MAX_VALUE);
    let tree: IntervalTree<i32> = intervals.iter().copied().collect();
    let balanced: BalancedIntervalTree<i32> = intervals.iter().copied().collect();

    let mut group = c.benchmark_group("query_points");
    for size in [100, 1000, 10000] {
        let points = random_points(size, MAX_VALUE);
        group.bench_with_input(BenchmarkId::new("plain", size), &points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .map(|point| tree.find_intersecting(black_box(point)).len())
                    .sum::<usize>()
            })
        });
        group.bench_with_input(BenchmarkId::new("balanced", size), &points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .map(|point| balanced.find_intersecting(black_box(point)).len())
                    .sum::<usize>()
            })
        });
    }
    group.finish();
}

fn bench_single_query(c: &mut Criterion) {
    let tree: IntervalTree<i32> = random_intervals(INTERVAL_COUNT, MAX_VALUE)
        .into_iter()
        .collect();
    let points = random_points(10000, MAX_VALUE);
    let mut point_iter = points.iter().cycle();

    c.bench_function("single_point_query", |b| {
        b.iter(|| {
            let point = point_iter.next().copied().unwrap_or_default();
            tree.find_intersecting(black_box(&point)).len()
        })
    });
}

criterion_group!(
    benches,
    bench_build_tree,
    bench_query_points,
    bench_single_query
);
criterion_main!(benches);
