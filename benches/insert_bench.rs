//! Bulk-insertion benchmark: many colliding pseudo-random keys loaded into
//! a fresh high-degree tree, the workload this structure is built for.

use arbordb::BTree;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::tempdir;

fn bulk_insert(c: &mut Criterion) {
    c.bench_function("insert_1k_random_keys_degree_50", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let path = dir.path().join("bench.db");
                let tree = BTree::open(path, 50).unwrap();
                (tree, dir)
            },
            |(mut tree, _dir)| {
                // Deterministic LCG keys; no rand dependency needed.
                let mut state = 0x2545_f491_u32;
                for _ in 0..1000 {
                    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    tree.insert((state % 500_000) as i32).unwrap();
                }
            },
            BatchSize::PerIteration,
        );
    });
}

criterion_group!(benches, bulk_insert);
criterion_main!(benches);
