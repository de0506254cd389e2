//! B-tree benchmarks.

use btree_index::BTree;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const KEYS: i64 = 10_000;
const ORDERS: [usize; 4] = [3, 8, 32, 128];

fn shuffled_keys() -> Vec<i64> {
    let mut keys: Vec<i64> = (0..KEYS).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(42));
    keys
}

fn build(order: usize, keys: &[i64]) -> BTree {
    let mut tree = BTree::new(order).unwrap();
    for &key in keys {
        tree.insert(key).unwrap();
    }
    tree
}

fn insert_sequential_benchmark(c: &mut Criterion) {
    let keys: Vec<i64> = (0..KEYS).collect();
    let mut group = c.benchmark_group("insert_sequential_10000");
    for order in ORDERS {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter(|| black_box(build(order, &keys).len()))
        });
    }
    group.finish();
}

fn insert_random_benchmark(c: &mut Criterion) {
    let keys = shuffled_keys();
    let mut group = c.benchmark_group("insert_random_10000");
    for order in ORDERS {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter(|| black_box(build(order, &keys).len()))
        });
    }
    group.finish();
}

fn search_benchmark(c: &mut Criterion) {
    let keys = shuffled_keys();
    let mut group = c.benchmark_group("search_10000");
    for order in ORDERS {
        let tree = build(order, &keys);
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, _| {
            b.iter(|| {
                let mut found = 0;
                for key in &keys {
                    if tree.search(key) {
                        found += 1;
                    }
                }
                black_box(found)
            })
        });
    }
    group.finish();
}

fn delete_random_benchmark(c: &mut Criterion) {
    let keys = shuffled_keys();
    let mut order_of_removal = keys.clone();
    order_of_removal.shuffle(&mut StdRng::seed_from_u64(7));

    let mut group = c.benchmark_group("delete_random_10000");
    for order in ORDERS {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter_batched(
                || build(order, &keys),
                |mut tree| {
                    for key in &order_of_removal {
                        tree.delete(key).unwrap();
                    }
                    black_box(tree.is_empty())
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    insert_sequential_benchmark,
    insert_random_benchmark,
    search_benchmark,
    delete_random_benchmark,
);
criterion_main!(benches);
