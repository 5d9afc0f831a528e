//! Registry of currently-held acquisitions.

use super::metadata::Locker;
use super::types::{Access, Requestor};
use parking_lot::Mutex;
use std::time::Duration;
use tracing::{info, warn};

/// Bookkeeping of currently-held [`Locker`] records.
///
/// Records are added and removed only by a thread holding the owning set's
/// group lock; the inner mutex just keeps the type `Sync` for the readers
/// (counts, snapshots, the auditor).
#[derive(Debug, Default)]
pub struct LockerRegistry {
    lockers: Mutex<Vec<Locker>>,
}

impl LockerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new acquisition.
    pub fn register(&self, locker: Locker) {
        self.lockers.lock().push(locker);
    }

    /// Remove the record matching this triple.
    ///
    /// Returns `None`, leaving the registry untouched, when no record matches.
    pub fn remove(
        &self,
        identifier: &str,
        requestor: &Requestor,
        access: Access,
    ) -> Option<Locker> {
        let mut lockers = self.lockers.lock();
        let index = lockers
            .iter()
            .position(|l| l.matches(identifier, requestor, access))?;
        Some(lockers.remove(index))
    }

    /// Number of outstanding records. Not synchronized with acquisitions.
    pub fn len(&self) -> usize {
        self.lockers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lockers.lock().is_empty()
    }

    /// Copy of the outstanding records.
    pub fn snapshot(&self) -> Vec<Locker> {
        self.lockers.lock().clone()
    }

    /// Records held longer than `threshold`.
    pub fn stale(&self, threshold: Duration) -> Vec<Locker> {
        self.lockers
            .lock()
            .iter()
            .filter(|l| l.is_stale(threshold))
            .cloned()
            .collect()
    }

    /// Log one line per outstanding record, with its creation trace.
    pub fn log_current(&self) {
        for locker in self.snapshot() {
            info!("{}\ncreated at:\n{}", locker, locker.trace());
        }
    }

    /// Log any outstanding records once and clear them.
    ///
    /// Returns how many records were outstanding. A second call finds the
    /// registry empty and logs nothing.
    pub fn report_outstanding(&self, dataset: &str) -> usize {
        let outstanding: Vec<Locker> = std::mem::take(&mut *self.lockers.lock());
        if outstanding.is_empty() {
            return 0;
        }

        warn!(
            "{} lock(s) still held on dataset '{}' at teardown",
            outstanding.len(),
            dataset
        );
        for locker in &outstanding {
            warn!("{}\ncreated at:\n{}", locker, locker.trace());
        }
        outstanding.len()
    }
}
