//! Executor facade and pool state block
//!
//! All size counters, the lifecycle state, and the work queue live in one
//! state block guarded by a single mutex (the pool lock). Held regions are
//! short: enqueue+classify, dequeue+classify, counter mutation. Tasks run
//! outside the lock. Single-lock discipline is deliberate: transitions are
//! small, contention is moderate, and multi-lock ordering bugs are
//! precluded.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use tpexec_core::error::{PoolError, PoolResult};
use tpexec_core::semaphore::Semaphore;
use tpexec_core::state::PoolState;
use tpexec_core::task::Task;
use tpexec_core::{pdebug, perror};

use crate::config::PoolConfig;
use crate::worker;

/// The authoritative record of one pool, guarded by the pool lock.
pub(crate) struct Core {
    /// Floor for the steady-state worker count
    pub(crate) min: u32,

    /// Hard ceiling; exceeded only transiently during a max reduction
    pub(crate) max: u32,

    /// Live workers
    pub(crate) cur: u32,

    /// Workers currently inside a task body
    pub(crate) act: u32,

    /// Idle timeout in seconds, 0 = infinite
    pub(crate) keep_alive: u32,

    /// Teardown wait bound in seconds, 0 = unbounded
    pub(crate) dtor_timeout: u32,

    /// Shutdown flavor; meaningful once state leaves RUNNING
    pub(crate) quit_asap: bool,

    /// Monotone lifecycle: RUNNING -> QUITTING -> DEAD
    pub(crate) state: PoolState,

    /// Pending work, FIFO
    pub(crate) queue: VecDeque<Task>,

    /// Next worker id, used for thread names and log context
    next_worker_id: u32,
}

impl Core {
    pub(crate) fn new(config: &PoolConfig) -> Self {
        Self {
            min: config.min_size,
            max: config.max_size,
            cur: 0,
            act: 0,
            keep_alive: config.keep_alive_secs,
            dtor_timeout: config.dtor_timeout_secs,
            quit_asap: false,
            state: PoolState::Running,
            queue: VecDeque::new(),
            next_worker_id: 0,
        }
    }
}

/// State shared between the facade and its detached workers.
pub(crate) struct Shared {
    pub(crate) core: Mutex<Core>,
    pub(crate) quit_cond: Condvar,
    pub(crate) sem: Semaphore,
}

impl Shared {
    pub(crate) fn lock_core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap()
    }
}

/// Start one detached worker. `cur` grows only on successful spawn; an OS
/// refusal is logged and the attempt abandoned.
fn spawn_worker(shared: &Arc<Shared>, core: &mut Core) {
    let id = core.next_worker_id;
    core.next_worker_id = core.next_worker_id.wrapping_add(1);

    let handle = thread::Builder::new()
        .name(format!("tpexec-worker-{}", id))
        .spawn({
            let shared = Arc::clone(shared);
            move || worker::worker_main(shared, id)
        });

    match handle {
        Ok(_) => core.cur += 1,
        Err(e) => perror!("failed to spawn worker {}: {}", id, e),
    }
}

/// An elastic pool of worker threads executing submitted tasks.
///
/// The pool grows on demand between a configured minimum and maximum,
/// retires workers idle longer than the keep-alive, and supports two
/// shutdown flavors: drain the queue first, or abandon it and quit as
/// soon as possible. Dropping the pool shuts it down asap and blocks
/// until every worker has exited (bounded by the destructor timeout).
///
/// Workers are detached threads; the pool tracks them by count, and
/// `cur == 0` under the DEAD state is the single source of truth for
/// "all workers gone".
pub struct ThreadPoolExecutor {
    shared: Arc<Shared>,
}

impl ThreadPoolExecutor {
    /// Create a pool from a configuration.
    ///
    /// Fails with `SizeOutOfRange` when `max_size == 0` or
    /// `min_size > max_size`; sizes are never clamped. The pool starts
    /// RUNNING with no workers and an empty queue; workers are created
    /// lazily on submit or eagerly via [`prestart_all_min_threads`].
    ///
    /// [`prestart_all_min_threads`]: ThreadPoolExecutor::prestart_all_min_threads
    pub fn new(config: PoolConfig) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: PoolConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(Core::new(&config)),
                quit_cond: Condvar::new(),
                sem: Semaphore::new(),
            }),
        }
    }

    /// Pool with exactly `threads` workers and no idle reclamation.
    pub fn fixed(threads: u32) -> PoolResult<Self> {
        Self::new(
            PoolConfig::new()
                .min_size(threads)
                .max_size(threads)
                .keep_alive_secs(0),
        )
    }

    /// Pool serializing all work on one worker.
    pub fn single_thread() -> Self {
        Self::from_valid(
            PoolConfig::new()
                .min_size(1)
                .max_size(1)
                .keep_alive_secs(0),
        )
    }

    /// Elastic pool: grow on demand, retire workers idle for 60 seconds.
    ///
    /// The ceiling is nominally unlimited; in practice the OS runs out of
    /// thread resources first if work is submitted faster than it drains.
    pub fn cached() -> Self {
        Self::from_valid(
            PoolConfig::new()
                .min_size(0)
                .max_size(u32::MAX)
                .keep_alive_secs(60),
        )
    }

    /// Queue a task for execution.
    ///
    /// Spawns a worker when below the minimum, or when the queue is
    /// longer than the number of idle workers and the ceiling permits;
    /// above the minimum the pool grows only under real backlog, which
    /// keeps it from oscillating. Posts the semaphore exactly once.
    ///
    /// A rejected task is dropped.
    pub fn submit<F>(&self, work: F) -> PoolResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut core = self.shared.lock_core();
        if !core.state.is_running() {
            return Err(PoolError::NotRunning);
        }
        core.queue.push_back(Task::new(work));

        debug_assert!(core.cur >= core.act);
        let idle = (core.cur - core.act) as usize;
        let backlogged = idle < core.queue.len();
        if core.cur < core.min || (backlogged && core.cur < core.max) {
            spawn_worker(&self.shared, &mut core);
        }
        self.shared.sem.post();
        Ok(())
    }

    /// Bring the pool up to its minimum worker count immediately.
    pub fn prestart_all_min_threads(&self) -> PoolResult<()> {
        let mut core = self.shared.lock_core();
        if !core.state.is_running() {
            return Err(PoolError::NotRunning);
        }
        let missing = core.min.saturating_sub(core.cur);
        for _ in 0..missing {
            spawn_worker(&self.shared, &mut core);
        }
        Ok(())
    }

    /// Number of live workers.
    pub fn pool_size(&self) -> u32 {
        self.shared.lock_core().cur
    }

    /// Number of workers currently executing a task.
    pub fn active_count(&self) -> u32 {
        self.shared.lock_core().act
    }

    /// Configured worker floor.
    pub fn min_pool_size(&self) -> u32 {
        self.shared.lock_core().min
    }

    /// Configured worker ceiling.
    pub fn max_pool_size(&self) -> u32 {
        self.shared.lock_core().max
    }

    /// Idle timeout in seconds, 0 = infinite.
    pub fn keep_alive_time(&self) -> u32 {
        self.shared.lock_core().keep_alive
    }

    /// Lower the worker floor or raise it (new workers arrive on demand,
    /// not immediately). Rejects a floor above the current ceiling.
    pub fn set_min_pool_size(&self, new_min: u32) -> PoolResult<()> {
        let mut core = self.shared.lock_core();
        if !core.state.is_running() {
            return Err(PoolError::NotRunning);
        }
        if new_min > core.max {
            return Err(PoolError::SizeOutOfRange {
                min: new_min,
                max: core.max,
            });
        }
        core.min = new_min;
        Ok(())
    }

    /// Change the worker ceiling.
    ///
    /// On reduction, posts the semaphore once per excess worker so that
    /// many idle workers wake, observe `cur > max`, and retire. On
    /// enlargement, spawns workers eagerly toward the queued-plus-active
    /// demand, up to the new ceiling.
    pub fn set_max_pool_size(&self, new_max: u32) -> PoolResult<()> {
        let mut core = self.shared.lock_core();
        if !core.state.is_running() {
            return Err(PoolError::NotRunning);
        }
        if new_max == 0 || new_max < core.min {
            return Err(PoolError::SizeOutOfRange {
                min: core.min,
                max: new_max,
            });
        }
        core.max = new_max;
        if core.cur > new_max {
            for _ in 0..(core.cur - new_max) {
                self.shared.sem.post();
            }
        } else if core.cur < new_max {
            let room = new_max - core.cur;
            let demand =
                (core.queue.len() as u32 + core.act).saturating_sub(core.cur);
            for _ in 0..room.min(demand) {
                spawn_worker(&self.shared, &mut core);
            }
        }
        Ok(())
    }

    /// Change the idle timeout (0 = infinite).
    ///
    /// Broadcasts on the semaphore so every parked worker re-arms its
    /// timed wait against the new value.
    pub fn set_keep_alive_time(&self, alive_secs: u32) -> PoolResult<()> {
        let mut core = self.shared.lock_core();
        if !core.state.is_running() {
            return Err(PoolError::NotRunning);
        }
        core.keep_alive = alive_secs;
        self.shared.sem.notify_all();
        Ok(())
    }

    /// Change the bound applied to the teardown wait in `Drop`
    /// (0 = wait forever).
    pub fn set_destructor_timeout(&self, secs: u32) -> PoolResult<()> {
        let mut core = self.shared.lock_core();
        if !core.state.is_running() {
            return Err(PoolError::NotRunning);
        }
        core.dtor_timeout = secs;
        Ok(())
    }

    /// Begin shutdown. No-op unless the pool is RUNNING.
    ///
    /// With `asap` the queue is abandoned and workers quit as soon as
    /// they re-enter the classifier; otherwise workers drain the queue
    /// first. Posts the semaphore once per live worker - deliberately
    /// not a broadcast, because a broadcast grants no credit and would
    /// miss workers that are mid-task and re-enter the wait later.
    pub fn shutdown(&self, asap: bool) {
        let mut core = self.shared.lock_core();
        if !core.state.is_running() {
            return;
        }
        core.quit_asap = asap;
        core.state = PoolState::Quitting;
        for _ in 0..core.cur {
            self.shared.sem.post();
        }
        if core.cur == 0 {
            core.state = PoolState::Dead;
            self.shared.quit_cond.notify_all();
            pdebug!("pool quiescent");
        }
    }

    /// Whether every worker has exited.
    ///
    /// QUITTING does not count: the contract is "all workers gone". After
    /// a drain shutdown this additionally implies every submitted task
    /// has run.
    pub fn is_shutdown(&self) -> bool {
        self.shared.lock_core().state.is_dead()
    }

    /// Block until the pool is fully terminated.
    ///
    /// `timeout_sec == 0` waits indefinitely and returns `true`. A
    /// nonzero timeout returns `false` when it elapses first. May be
    /// called without a prior [`shutdown`]; it then simply blocks until
    /// someone else shuts the pool down.
    ///
    /// [`shutdown`]: ThreadPoolExecutor::shutdown
    pub fn await_termination(&self, timeout_sec: u32) -> bool {
        let mut core = self.shared.lock_core();
        if timeout_sec == 0 {
            while !(core.cur == 0 && core.state.is_dead()) {
                core = self.shared.quit_cond.wait(core).unwrap();
            }
            return true;
        }

        let deadline = Instant::now() + Duration::from_secs(u64::from(timeout_sec));
        while !(core.cur == 0 && core.state.is_dead()) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _timed_out) = self
                .shared
                .quit_cond
                .wait_timeout(core, deadline - now)
                .unwrap();
            core = guard;
        }
        true
    }
}

impl Drop for ThreadPoolExecutor {
    /// Guarantees that no worker still references the pool when this
    /// returns (bounded by the destructor timeout). Trades queued work
    /// for liveness by quitting asap.
    fn drop(&mut self) {
        let timeout = self.shared.lock_core().dtor_timeout;
        self.shutdown(true);
        self.await_termination(timeout);
    }
}
