//! Signed-count semaphore with timed wait
//!
//! Parks a worker when no work is available, releases one worker per post,
//! and reports timeout vs. real wake. A plain condition variable cannot
//! distinguish "parked because no work" from "work arrived but the signal
//! was missed"; the signed counter keeps `wait()` composable with bursts
//! of posts without the caller rechecking predicates under its own lock.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// Counting semaphore built on a mutex and a condition variable.
///
/// The counter is signed: the positive part is unconsumed posts, the
/// negative part is the number of parked waiters. A post that observes a
/// non-positive counter after incrementing wakes exactly one waiter.
pub struct Semaphore {
    /// Positive: pending posts. Negative: -(parked waiters).
    cnt: Mutex<i64>,

    /// Parked waiters block here.
    cv: Condvar,
}

impl Semaphore {
    /// Create a semaphore with no pending posts and no waiters.
    pub fn new() -> Self {
        Self {
            cnt: Mutex::new(0),
            cv: Condvar::new(),
        }
    }

    fn count(&self) -> MutexGuard<'_, i64> {
        self.cnt.lock().unwrap()
    }

    /// Release one unit.
    ///
    /// Wakes one parked waiter when the increment lands at or below zero,
    /// i.e. somebody is (or was) parked.
    pub fn post(&self) {
        let mut cnt = self.count();
        *cnt += 1;
        if *cnt <= 0 {
            self.cv.notify_one();
        }
    }

    /// Wake every parked waiter without granting any posts.
    ///
    /// The counter is raised to zero so the woken waiters do not consume
    /// credit. Used to make parked workers promptly re-evaluate changed
    /// configuration (e.g. a new keep-alive). No-op when nobody is parked.
    pub fn notify_all(&self) {
        let mut cnt = self.count();
        if *cnt < 0 {
            *cnt = 0;
            self.cv.notify_all();
        }
    }

    /// Acquire one unit, parking for at most `timeout_sec` seconds.
    ///
    /// `timeout_sec == 0` waits indefinitely. Returns `true` on a normal
    /// wake, `false` when the timeout elapsed. A timed-out waiter undoes
    /// its decrement; it did not consume a post.
    pub fn wait(&self, timeout_sec: u32) -> bool {
        let mut cnt = self.count();
        *cnt -= 1;
        if *cnt >= 0 {
            return true;
        }

        if timeout_sec == 0 {
            drop(self.cv.wait(cnt).unwrap());
            return true;
        }

        let dur = Duration::from_secs(u64::from(timeout_sec));
        let (mut cnt, result) = self.cv.wait_timeout(cnt, dur).unwrap();
        if result.timed_out() {
            // Nobody freed us, so we free ourselves.
            *cnt += 1;
            return false;
        }
        true
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_post_then_wait_ordering() {
        let s = Semaphore::new();
        s.post();
        s.post();

        assert!(s.wait(1));
        assert!(s.wait(1));
        assert!(!s.wait(1));
        assert!(!s.wait(1));

        s.post();
        assert!(s.wait(1));
    }

    #[test]
    fn test_posts_release_parked_waiters() {
        let s = Arc::new(Semaphore::new());
        let woken = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let s = Arc::clone(&s);
            let woken = Arc::clone(&woken);
            handles.push(thread::spawn(move || {
                if s.wait(5) {
                    woken.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        // Let the waiters park before posting.
        thread::sleep(Duration::from_millis(200));
        for _ in 0..8 {
            s.post();
        }

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(woken.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_posts_in_batches() {
        let s = Arc::new(Semaphore::new());
        let woken = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let s = Arc::clone(&s);
            let woken = Arc::clone(&woken);
            handles.push(thread::spawn(move || {
                if s.wait(0) {
                    woken.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        thread::sleep(Duration::from_millis(200));
        for batch in 1..=2 {
            s.post();
            s.post();
            s.post();
            thread::sleep(Duration::from_millis(300));
            assert_eq!(woken.load(Ordering::SeqCst), batch * 3);
        }

        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_notify_all_grants_no_posts() {
        let s = Arc::new(Semaphore::new());

        let mut handles = Vec::new();
        for _ in 0..2 {
            let s = Arc::clone(&s);
            handles.push(thread::spawn(move || s.wait(0)));
        }

        thread::sleep(Duration::from_millis(200));
        s.notify_all();

        for h in handles {
            // Woken normally, not by timeout.
            assert!(h.join().unwrap());
        }

        // The broadcast left no credit behind.
        assert!(!s.wait(1));
    }

    #[test]
    fn test_notify_all_without_waiters_is_noop() {
        let s = Semaphore::new();
        s.post();
        s.notify_all();
        // The pending post survives an empty broadcast.
        assert!(s.wait(1));
    }
}
