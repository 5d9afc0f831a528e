//! Background auditor reporting long-held lockers.
//!
//! The auditor runs in a separate thread and periodically logs every locker
//! older than a threshold. It holds only a weak reference to the set, so it
//! never keeps a dataset alive and stops by itself once the set is dropped.

use crate::files::ShpFiles;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest single sleep, so shutdown stays responsive.
const CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Background thread logging lockers held longer than a threshold.
///
/// Diagnostics only: it reads the registry and never releases anything.
/// Stop it with [`shutdown`](Self::shutdown) or by dropping it.
pub struct LockAuditor {
    thread_handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl LockAuditor {
    /// Start auditing `files` every `interval`, reporting lockers older than `stale_after`.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the thread could not be created.
    pub fn start(
        files: &Arc<ShpFiles>,
        interval: Duration,
        stale_after: Duration,
    ) -> std::io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let files = Arc::downgrade(files);

        let thread_handle = thread::Builder::new()
            .name("shpfiles-audit".to_string())
            .spawn(move || {
                Self::run_loop(files, interval, stale_after, shutdown_clone);
            })?;

        debug!("Lock auditor started (interval: {:?})", interval);

        Ok(Self {
            thread_handle: Some(thread_handle),
            shutdown,
        })
    }

    /// Start an auditor using the set's configured interval and threshold.
    pub fn start_configured(files: &Arc<ShpFiles>) -> std::io::Result<Self> {
        let config = files.config();
        let (interval, stale_after) = (config.audit_interval(), config.stale_after());
        Self::start(files, interval, stale_after)
    }

    fn run_loop(
        files: Weak<ShpFiles>,
        interval: Duration,
        stale_after: Duration,
        shutdown: Arc<AtomicBool>,
    ) {
        let check_interval = interval.min(CHECK_INTERVAL);
        let mut elapsed = Duration::ZERO;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            thread::sleep(check_interval);
            if files.strong_count() == 0 {
                debug!("Dataset dropped, lock auditor exiting");
                break;
            }
            elapsed += check_interval;
            if elapsed < interval {
                continue;
            }
            elapsed = Duration::ZERO;

            if let Some(files) = files.upgrade() {
                Self::audit(&files, stale_after);
            }
        }

        debug!("Lock auditor stopped");
    }

    /// One audit pass. Returns the number of stale lockers reported.
    pub(crate) fn audit(files: &ShpFiles, stale_after: Duration) -> usize {
        let stale = files.registry().stale(stale_after);
        for locker in &stale {
            warn!(
                "Long-held lock on dataset '{}': {}\ncreated at:\n{}",
                files.base(),
                locker,
                locker.trace()
            );
        }
        stale.len()
    }

    /// Signal the auditor to stop. Non-blocking.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Whether the auditor thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true)
    }
}

impl Drop for LockAuditor {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}
