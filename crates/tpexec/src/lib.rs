//! # tpexec - Elastic Worker-Pool Executor
//!
//! A long-lived pool of worker threads that accepts unit-of-work
//! submissions from many producer threads. The pool sizes itself between
//! a configurable minimum and maximum, retires workers idle longer than
//! the keep-alive, and supports two shutdown flavors: drain the queue
//! first, or abandon it and quit as soon as possible.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tpexec::{PoolConfig, ThreadPoolExecutor};
//!
//! fn main() {
//!     let pool = ThreadPoolExecutor::new(
//!         PoolConfig::new().min_size(2).max_size(8).keep_alive_secs(60),
//!     )
//!     .unwrap();
//!
//!     for i in 0..16 {
//!         pool.submit(move || {
//!             println!("task {} running", i);
//!         })
//!         .unwrap();
//!     }
//!
//!     // Let every submitted task finish, then wait for quiescence.
//!     pool.shutdown(false);
//!     pool.await_termination(0);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      Producers                         │
//! │            submit(), shutdown(), setters               │
//! └────────────────────────────────────────────────────────┘
//!                            │  pool lock
//!                            ▼
//! ┌────────────────────────────────────────────────────────┐
//! │                     State block                        │
//! │     sizes, lifecycle, FIFO queue, quit condition       │
//! └────────────────────────────────────────────────────────┘
//!                            │  semaphore post/wait
//!          ┌─────────────────┼─────────────────┐
//!          ▼                 ▼                 ▼
//!    ┌───────────┐     ┌───────────┐     ┌───────────┐
//!    │  Worker   │     │  Worker   │ ... │  Worker   │
//!    │ WAIT/WORK │     │ WAIT/WORK │     │ WAIT/WORK │
//!    └───────────┘     └───────────┘     └───────────┘
//! ```
//!
//! Workers are detached threads; the pool tracks them only by count. The
//! quit condition plus `pool_size() == 0` is the single source of truth
//! for "all workers gone", which [`ThreadPoolExecutor::await_termination`]
//! and the destructor rely on.

// Re-export core types
pub use tpexec_core::{PoolError, PoolResult, PoolState, Semaphore, Task};

// Re-export plog macros for debug logging
pub use tpexec_core::plog::{self, init as init_logging, set_log_level, LogLevel};
pub use tpexec_core::{pdebug, perror, pinfo, ptrace, pwarn};

// Re-export env utilities
pub use tpexec_core::{env_get, env_get_bool};

// Re-export runtime types
pub use tpexec_runtime::{PoolConfig, ThreadPoolExecutor};
