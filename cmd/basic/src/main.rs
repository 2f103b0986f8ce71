//! Basic worker-pool example
//!
//! Demonstrates lazy growth, draining shutdown, and the termination
//! barrier.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tpexec::{PoolConfig, PoolResult, ThreadPoolExecutor};

fn main() -> PoolResult<()> {
    println!("=== tpexec Basic Example ===\n");

    let pool = ThreadPoolExecutor::new(
        PoolConfig::new().min_size(2).max_size(4).keep_alive_secs(0),
    )?;

    println!("Pool created: size={} (workers are lazy)", pool.pool_size());

    pool.prestart_all_min_threads()?;
    println!("After prestart: size={}", pool.pool_size());

    let completed = Arc::new(AtomicUsize::new(0));
    let total_tasks = 8;

    println!("\nSubmitting {} tasks...", total_tasks);
    for i in 0..total_tasks {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            std::thread::sleep(Duration::from_millis(250));
            println!("[task {}] done", i);
            completed.fetch_add(1, Ordering::SeqCst);
        })?;
    }

    println!(
        "While busy: size={} active={}",
        pool.pool_size(),
        pool.active_count()
    );

    // Drain: every submitted task runs before the workers retire.
    pool.shutdown(false);
    pool.await_termination(0);

    println!(
        "\n{}/{} tasks completed, shutdown={}",
        completed.load(Ordering::SeqCst),
        total_tasks,
        pool.is_shutdown()
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
