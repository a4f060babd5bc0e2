//! Throughput benchmarks: cortado vs moka vs quick_cache.
//!
//! Each group replays the same workload against all three caches so criterion
//! can report them side by side.  moka and quick_cache use different
//! admission policies, so hit rates differ; the comparison is about raw
//! operation cost.
//!
//! Run with:
//!     cargo bench --bench throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use cortado::CacheBuilder;
use moka::sync::Cache as MokaCache;
use quick_cache::sync::Cache as QuickCache;

/// Number of entries each cache is pre-filled with and its logical capacity.
const CAP: u64 = 10_000;

/// Operations executed per criterion iteration (hot-loop size).
const OPS: u64 = 1_000;

// ---------------------------------------------------------------------------
// Group 1: get_hit — all keys present, pure read throughput.
// ---------------------------------------------------------------------------

fn bench_get_hit(c: &mut Criterion) {
    let cortado: cortado::Cache<u64, u64> = CacheBuilder::new(CAP).build();
    let moka: MokaCache<u64, u64> = MokaCache::new(CAP);
    let qc: QuickCache<u64, u64> = QuickCache::new(CAP as usize);
    for i in 0..CAP {
        cortado.insert(i, i * 2);
        moka.insert(i, i * 2);
        qc.insert(i, i * 2);
    }

    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("cortado", |b| {
        b.iter(|| {
            for i in 0..OPS {
                black_box(cortado.get(black_box(&i)));
            }
        })
    });

    group.bench_function("moka", |b| {
        b.iter(|| {
            for i in 0..OPS {
                black_box(moka.get(black_box(&i)));
            }
        })
    });

    group.bench_function("quick_cache", |b| {
        b.iter(|| {
            for i in 0..OPS {
                black_box(qc.get(black_box(&i)));
            }
        })
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Group 2: insert_evicting — always-new keys, eviction on every batch.
// ---------------------------------------------------------------------------

fn bench_insert_evicting(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_evicting");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("cortado", |b| {
        let cache: cortado::Cache<u64, u64> = CacheBuilder::new(CAP).build();
        let mut key = 0u64;
        b.iter(|| {
            for _ in 0..OPS {
                cache.insert(black_box(key), black_box(key));
                key = key.wrapping_add(1);
            }
            // Deferred events accumulate without a listener; keep the queue
            // short so the benchmark measures insert, not queue growth.
            cache.clean_up();
        })
    });

    group.bench_function("moka", |b| {
        let cache: MokaCache<u64, u64> = MokaCache::new(CAP);
        let mut key = 0u64;
        b.iter(|| {
            for _ in 0..OPS {
                cache.insert(black_box(key), black_box(key));
                key = key.wrapping_add(1);
            }
        })
    });

    group.bench_function("quick_cache", |b| {
        let cache: QuickCache<u64, u64> = QuickCache::new(CAP as usize);
        let mut key = 0u64;
        b.iter(|| {
            for _ in 0..OPS {
                cache.insert(black_box(key), black_box(key));
                key = key.wrapping_add(1);
            }
        })
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Group 3: mixed_80r_20w — working set 2× capacity, prime-step key cycling.
// ---------------------------------------------------------------------------

fn bench_mixed_80r_20w(c: &mut Criterion) {
    const WORKING_SET: u64 = CAP * 2;
    const STEP: u64 = 7_919; // prime

    let mut group = c.benchmark_group("mixed_80r_20w");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("cortado", |b| {
        let cache: cortado::Cache<u64, u64> = CacheBuilder::new(CAP).build();
        for i in 0..CAP {
            cache.insert(i, i);
        }
        let mut cursor = 0u64;
        b.iter(|| {
            for i in 0..OPS {
                let k = cursor % WORKING_SET;
                if i % 5 == 0 {
                    cache.insert(black_box(k), black_box(k));
                } else {
                    black_box(cache.get(black_box(&k)));
                }
                cursor = cursor.wrapping_add(STEP);
            }
            cache.clean_up();
        })
    });

    group.bench_function("moka", |b| {
        let cache: MokaCache<u64, u64> = MokaCache::new(CAP);
        for i in 0..CAP {
            cache.insert(i, i);
        }
        let mut cursor = 0u64;
        b.iter(|| {
            for i in 0..OPS {
                let k = cursor % WORKING_SET;
                if i % 5 == 0 {
                    cache.insert(black_box(k), black_box(k));
                } else {
                    black_box(cache.get(black_box(&k)));
                }
                cursor = cursor.wrapping_add(STEP);
            }
        })
    });

    group.bench_function("quick_cache", |b| {
        let cache: QuickCache<u64, u64> = QuickCache::new(CAP as usize);
        for i in 0..CAP {
            cache.insert(i, i);
        }
        let mut cursor = 0u64;
        b.iter(|| {
            for i in 0..OPS {
                let k = cursor % WORKING_SET;
                if i % 5 == 0 {
                    cache.insert(black_box(k), black_box(k));
                } else {
                    black_box(cache.get(black_box(&k)));
                }
                cursor = cursor.wrapping_add(STEP);
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_get_hit,
    bench_insert_evicting,
    bench_mixed_80r_20w,
);
criterion_main!(benches);
