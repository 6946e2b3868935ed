use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tasker_batch::{partition, produce_concurrent, produce_sequential, InlineContext};

const ITEM_COUNT: u64 = 100_000;

fn checksum(batch: &[u64]) -> anyhow::Result<Vec<u64>> {
    Ok(batch.iter().map(|n| n.wrapping_mul(2_654_435_761) >> 7).collect())
}

fn benchmark_partition(c: &mut Criterion) {
    let items: Vec<u64> = (0..ITEM_COUNT).collect();
    c.bench_function("partition_100k_by_1000", |b| {
        b.iter(|| partition(black_box(&items), 1000))
    });
}

fn benchmark_dispatch_modes(c: &mut Criterion) {
    let items: Vec<u64> = (0..ITEM_COUNT).collect();
    let mut group = c.benchmark_group("produce_100k");

    for batch_size in [100usize, 1000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("sequential", batch_size),
            &batch_size,
            |b, &size| b.iter(|| produce_sequential(&checksum, black_box(&items), size)),
        );
        group.bench_with_input(
            BenchmarkId::new("concurrent_inline", batch_size),
            &batch_size,
            |b, &size| {
                b.iter(|| produce_concurrent(checksum, items.clone(), size, Some(&InlineContext)))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("concurrent_shared_pool", batch_size),
            &batch_size,
            |b, &size| b.iter(|| produce_concurrent(checksum, items.clone(), size, None)),
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_partition, benchmark_dispatch_modes);
criterion_main!(benches);
