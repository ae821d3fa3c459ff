//! Criterion microbenches for the core put/get paths of each policy.

use std::hint::black_box;
use std::time::Instant;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use tricache::policy::arc::ArcCache;
use tricache::policy::lfu::LfuCache;
use tricache::policy::lru::LruCache;
use tricache::policy::lru_k::LruKCache;
use tricache::policy::sharded::HashLruCache;
use tricache::traits::CachePolicy;

const CAPACITY: usize = 4096;
const OPS: u64 = 100_000;

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(OPS));

    macro_rules! hit_bench {
        ($name:literal, $cache:expr) => {
            group.bench_function($name, |b| {
                b.iter_custom(|iters| {
                    let cache = $cache;
                    for i in 0..CAPACITY as u64 {
                        cache.put(i, i);
                    }
                    // Warm a second round so gated policies admit.
                    for i in 0..CAPACITY as u64 {
                        cache.put(i, i);
                    }
                    let mut out = 0u64;
                    let start = Instant::now();
                    for _ in 0..iters {
                        for i in 0..OPS {
                            let key = i % (CAPACITY as u64);
                            black_box(cache.get_to(&key, &mut out));
                        }
                    }
                    start.elapsed()
                })
            });
        };
    }

    hit_bench!("lru", LruCache::<u64, u64>::new(CAPACITY));
    hit_bench!("lfu", LfuCache::<u64, u64>::new(CAPACITY));
    hit_bench!("arc", ArcCache::<u64, u64>::new(CAPACITY));
    hit_bench!("lru_k", LruKCache::<u64, u64>::new(CAPACITY, CAPACITY, 2));
    hit_bench!("sharded_lru", HashLruCache::<u64, u64>::new(CAPACITY, 8));

    group.finish();
}

fn bench_insert_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_evict");
    group.throughput(Throughput::Elements(OPS));

    macro_rules! churn_bench {
        ($name:literal, $cache:expr) => {
            group.bench_function($name, |b| {
                b.iter_custom(|iters| {
                    let cache = $cache;
                    let start = Instant::now();
                    for iter in 0..iters {
                        for i in 0..OPS {
                            // Monotone keys: every insert past capacity evicts.
                            let key = iter * OPS + i;
                            cache.put(black_box(key), key);
                        }
                    }
                    start.elapsed()
                })
            });
        };
    }

    churn_bench!("lru", LruCache::<u64, u64>::new(CAPACITY));
    churn_bench!("lfu", LfuCache::<u64, u64>::new(CAPACITY));
    churn_bench!("arc", ArcCache::<u64, u64>::new(CAPACITY));
    churn_bench!("sharded_lru", HashLruCache::<u64, u64>::new(CAPACITY, 8));

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_insert_evict);
criterion_main!(benches);
