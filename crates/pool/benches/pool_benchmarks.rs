//! Pool versus heap for the workloads the pool targets:
//! - single obtain/release churn
//! - bursts of short-lived tree nodes

#![allow(unsafe_code)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use reuse_pool::prelude::*;

// ============================================================================
// Obtain/release churn
// ============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    let pool = PoolAllocator::<[u64; 4]>::with_config(PoolConfig::performance().with_capacity(64))
        .expect("pool");
    group.bench_function("pool", |b| {
        b.iter(|| {
            let block = pool.obtain(black_box(1)).expect("obtain");
            // SAFETY: block was obtained just above.
            unsafe { pool.release(block, 1) };
        });
    });

    let heap = HeapAuthority::<[u64; 4]>::new();
    group.bench_function("heap", |b| {
        b.iter(|| {
            let block = heap.obtain(black_box(1)).expect("obtain");
            // SAFETY: block was obtained just above.
            unsafe { heap.release(block, 1) };
        });
    });

    group.finish();
}

// ============================================================================
// Tree node bursts
// ============================================================================

fn bench_map_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_fill");

    for size in [16u32, 256] {
        let alloc = PoolAllocator::<(u32, u32)>::with_config(
            PoolConfig::performance().with_capacity(size as usize),
        )
        .expect("pool");

        group.bench_with_input(BenchmarkId::new("pool", size), &size, |b, &size| {
            b.iter(|| {
                let mut map = PoolMap::new_in(alloc.clone());
                for k in 0..size {
                    map.insert(k.wrapping_mul(2_654_435_761), k).expect("insert");
                }
                black_box(map.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("heap", size), &size, |b, &size| {
            b.iter(|| {
                let mut map = PoolMap::new_in(HeapAuthority::<(u32, u32)>::new());
                for k in 0..size {
                    map.insert(k.wrapping_mul(2_654_435_761), k).expect("insert");
                }
                black_box(map.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_churn, bench_map_fill);
criterion_main!(benches);
