//! Worker loop
//!
//! Every worker runs the same loop: wait on the semaphore with the
//! keep-alive as timeout, then classify the next action under the pool
//! lock. One classifier covers steady state, reconfiguration-driven
//! shrink, keep-alive reclamation, and both shutdown flavors, which keeps
//! the decision matrix small and auditable.

use std::sync::Arc;

use tpexec_core::plog;
use tpexec_core::state::PoolState;
use tpexec_core::task::Task;
use tpexec_core::{pdebug, pwarn};

use crate::executor::{Core, Shared};

/// Next action for a worker, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Pop the front task and execute it outside the lock
    Work,

    /// Retire this worker
    Suicide,

    /// Nothing to do, go back to the semaphore
    Wait,
}

/// Classify the next action against the current state block.
///
/// `timed_out` is whether the preceding semaphore wait expired rather
/// than being released by a post.
pub(crate) fn classify(core: &Core, timed_out: bool) -> Verdict {
    let queue_empty = core.queue.is_empty();
    let over_ceiling = core.cur > core.max;
    let quick_quit = core.state.is_quitting() && core.quit_asap;
    let drain_done = core.state.is_quitting() && queue_empty;
    let idle_expired = timed_out && queue_empty && core.cur > core.min;

    if !queue_empty && !over_ceiling && !quick_quit {
        Verdict::Work
    } else if over_ceiling || quick_quit || drain_done || idle_expired {
        Verdict::Suicide
    } else {
        Verdict::Wait
    }
}

enum Step {
    Run(Task),
    Exit,
    Park,
}

/// Body of one detached worker thread.
pub(crate) fn worker_main(shared: Arc<Shared>, worker_id: u32) {
    plog::set_worker_id(worker_id);
    pdebug!("worker started");

    loop {
        let keep_alive = shared.lock_core().keep_alive;
        let timed_out = !shared.sem.wait(keep_alive);

        let step = {
            let mut core = shared.lock_core();
            // Workers are gone before the pool can be DEAD.
            debug_assert!(!core.state.is_dead());

            match classify(&core, timed_out) {
                Verdict::Work => match core.queue.pop_front() {
                    Some(task) => {
                        core.act += 1;
                        Step::Run(task)
                    }
                    None => Step::Park,
                },
                Verdict::Suicide => {
                    core.cur -= 1;
                    if core.cur == 0 && core.state.is_quitting() {
                        core.state = PoolState::Dead;
                        shared.quit_cond.notify_all();
                        pdebug!("pool quiescent");
                    }
                    Step::Exit
                }
                Verdict::Wait => Step::Park,
            }
        };

        match step {
            Step::Run(task) => {
                if !task.run() {
                    pwarn!("task panicked; worker continues");
                }
                shared.lock_core().act -= 1;
            }
            Step::Exit => break,
            Step::Park => continue,
        }
    }

    pdebug!("worker exiting");
    plog::clear_worker_id();
}
