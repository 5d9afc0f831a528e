//! The single mutual-exclusion lock shared by all components of one set.

use parking_lot::{Condvar, Mutex};

/// A lock that is taken and released by separate calls rather than by a
/// scoped guard. Waiters are woken one at a time; no fairness is promised.
#[derive(Debug, Default)]
pub(crate) struct GroupLock {
    held: Mutex<bool>,
    freed: Condvar,
}

impl GroupLock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Block until the lock is free, then take it.
    pub(crate) fn lock(&self) {
        let mut held = self.held.lock();
        while *held {
            self.freed.wait(&mut held);
        }
        *held = true;
    }

    /// Take the lock if it is free. Never blocks on a holder.
    pub(crate) fn try_lock(&self) -> bool {
        let mut held = self.held.lock();
        if *held {
            false
        } else {
            *held = true;
            true
        }
    }

    /// Give the lock back and wake one waiter.
    pub(crate) fn unlock(&self) {
        let mut held = self.held.lock();
        *held = false;
        drop(held);
        self.freed.notify_one();
    }

    /// Racy snapshot, for diagnostics and tests only.
    pub(crate) fn is_locked(&self) -> bool {
        *self.held.lock()
    }
}
