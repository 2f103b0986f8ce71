//! Opaque unit of work
//!
//! A task is any zero-argument callable with no return value. The pool
//! owns a task from submission until it is either handed to a worker for
//! execution or discarded during an asap shutdown.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// A boxed unit of work for a pool.
///
/// Tasks carry no result channel; whatever they compute must be
/// communicated through captured state.
pub struct Task {
    work: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    /// Wrap a callable as a task.
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            work: Box::new(work),
        }
    }

    /// Run the task, containing any panic it raises.
    ///
    /// Returns `false` when the task panicked. The panic payload is
    /// swallowed so a misbehaving task cannot take its worker down.
    pub fn run(self) -> bool {
        catch_unwind(AssertUnwindSafe(self.work)).is_ok()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_run_executes_work() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let task = Task::new(move || flag.store(true, Ordering::SeqCst));
        assert!(task.run());
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_run_contains_panic() {
        let task = Task::new(|| panic!("boom"));
        assert!(!task.run());
    }
}
