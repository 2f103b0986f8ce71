//! Submission-path benchmarks
//!
//! Measures the enqueue+post fast path against an already-saturated pool,
//! and the cost of a full submit/drain/terminate cycle.

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tpexec::{PoolConfig, ThreadPoolExecutor};

fn bench_submit_noop(c: &mut Criterion) {
    let pool = ThreadPoolExecutor::fixed(4).expect("valid fixed pool");
    let sink = Arc::new(AtomicU64::new(0));

    c.bench_function("submit_noop", |b| {
        b.iter(|| {
            let sink = Arc::clone(&sink);
            pool.submit(move || {
                sink.fetch_add(1, Ordering::Relaxed);
            })
            .expect("pool is running");
        })
    });

    pool.shutdown(false);
    pool.await_termination(0);
}

fn bench_drain_cycle(c: &mut Criterion) {
    c.bench_function("drain_cycle_64_tasks", |b| {
        b.iter(|| {
            let pool = ThreadPoolExecutor::new(
                PoolConfig::new().min_size(2).max_size(4).keep_alive_secs(0),
            )
            .expect("valid config");
            let sink = Arc::new(AtomicU64::new(0));
            for _ in 0..64 {
                let sink = Arc::clone(&sink);
                pool.submit(move || {
                    sink.fetch_add(1, Ordering::Relaxed);
                })
                .expect("pool is running");
            }
            pool.shutdown(false);
            pool.await_termination(0);
            assert_eq!(sink.load(Ordering::Relaxed), 64);
        })
    });
}

criterion_group!(benches, bench_submit_noop, bench_drain_cycle);
criterion_main!(benches);
