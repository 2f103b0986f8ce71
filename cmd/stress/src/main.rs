//! Stress test - many producers, one pool
//!
//! Hammers a single elastic pool from several producer threads and
//! verifies that a draining shutdown loses nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tpexec::{PoolConfig, ThreadPoolExecutor};

fn main() {
    println!("=== tpexec Stress Test ===\n");

    let num_tasks: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);
    let num_producers: usize = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(4);

    let max_workers = std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(4);

    println!(
        "Submitting {} tasks from {} producers (max {} workers)...",
        num_tasks, num_producers, max_workers
    );

    let pool = Arc::new(
        ThreadPoolExecutor::new(
            PoolConfig::new()
                .min_size(0)
                .max_size(max_workers)
                .keep_alive_secs(60),
        )
        .expect("valid pool configuration"),
    );

    let completed = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let per_producer = num_tasks / num_producers;
    let mut producers = Vec::new();
    for _ in 0..num_producers {
        let pool = Arc::clone(&pool);
        let completed = Arc::clone(&completed);
        producers.push(std::thread::spawn(move || {
            for _ in 0..per_producer {
                let completed = Arc::clone(&completed);
                pool.submit(move || {
                    completed.fetch_add(1, Ordering::Relaxed);
                })
                .expect("pool is running");
            }
        }));
    }

    for p in producers {
        let _ = p.join();
    }

    let submit_time = start.elapsed();
    println!("\nSubmit time: {:?}", submit_time);
    println!(
        "Submit rate: {:.0} tasks/sec",
        (per_producer * num_producers) as f64 / submit_time.as_secs_f64()
    );
    println!(
        "Pool while draining: size={} active={}",
        pool.pool_size(),
        pool.active_count()
    );

    pool.shutdown(false);
    pool.await_termination(0);

    let total = start.elapsed();
    let done = completed.load(Ordering::Relaxed);
    println!("\nCompleted: {}/{}", done, per_producer * num_producers);
    println!("Total time: {:?}", total);
    assert_eq!(done as usize, per_producer * num_producers);

    println!("\n=== Stress Complete ===");
}
