use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// A one-shot latch used to stop a background loop.
///
/// Unlike a semaphore the latch never resets: once tripped, every current and
/// future waiter observes it.
#[derive(Debug, Default)]
pub struct StopLatch {
    tripped: Mutex<bool>,
    cond_var: Condvar,
}

impl StopLatch {
    pub fn new() -> Self {
        StopLatch {
            tripped: Mutex::new(false),
            cond_var: Condvar::new(),
        }
    }

    /// Trips the latch and wakes all waiting threads.
    pub fn trip(&self) {
        let mut guard = self.tripped.lock();
        *guard = true;
        self.cond_var.notify_all();
    }

    pub fn is_tripped(&self) -> bool {
        *self.tripped.lock()
    }

    /// Sleeps for up to `duration`, returning early if the latch is tripped.
    ///
    /// Returns `true` if the latch was tripped, `false` if the full duration
    /// elapsed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let deadline = Instant::now().checked_add(duration);
        let mut guard = self.tripped.lock();

        while !*guard {
            match deadline {
                Some(deadline) => {
                    if self.cond_var.wait_until(&mut guard, deadline).timed_out() {
                        return *guard;
                    }
                }
                None => self.cond_var.wait(&mut guard),
            }
        }

        true
    }
}
