//! Locker records describing one held acquisition.

use super::types::{Access, Requestor};
use chrono::{DateTime, Duration, Utc};
use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

/// Bookkeeping for one currently-held acquisition.
#[derive(Debug, Clone)]
pub struct Locker {
    /// Identifier of the component that was acquired.
    pub identifier: String,

    /// Who acquired it.
    pub requestor: Requestor,

    /// Read or write.
    pub access: Access,

    /// Owner of the process (e.g., `user@HOST:pid`).
    pub owner: String,

    /// Name (or id) of the acquiring thread.
    pub thread: String,

    /// When the acquisition happened.
    pub created_at: DateTime<Utc>,

    trace: Arc<Backtrace>,
}

impl Locker {
    /// Record an acquisition made now by the current thread.
    ///
    /// With `force_trace` the creation trace is always captured; otherwise it
    /// follows `RUST_BACKTRACE`.
    pub fn new(identifier: &str, requestor: &Requestor, access: Access, force_trace: bool) -> Self {
        let trace = if force_trace {
            Backtrace::force_capture()
        } else {
            Backtrace::capture()
        };
        let current = std::thread::current();
        let thread = match current.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", current.id()),
        };

        Self {
            identifier: identifier.to_string(),
            requestor: requestor.clone(),
            access,
            owner: get_owner_string(),
            thread,
            created_at: Utc::now(),
            trace: Arc::new(trace),
        }
    }

    /// Whether this record is the one a release for this triple refers to.
    pub fn matches(&self, identifier: &str, requestor: &Requestor, access: Access) -> bool {
        self.access == access && self.requestor == *requestor && self.identifier == identifier
    }

    /// Stack trace captured when the acquisition was made.
    pub fn trace(&self) -> &Backtrace {
        &self.trace
    }

    /// How long the acquisition has been held.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let seconds = age.num_seconds();
        let minutes = age.num_minutes();
        let hours = age.num_hours();

        if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds % 60)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Check if the acquisition has been held longer than `threshold`.
    pub fn is_stale(&self, threshold: std::time::Duration) -> bool {
        self.age().to_std().map(|age| age > threshold).unwrap_or(false)
    }
}

impl fmt::Display for Locker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lock on '{}' held by {} (owner: {}, thread: {}, age: {})",
            self.access,
            self.identifier,
            self.requestor,
            self.owner,
            self.thread,
            self.age_string()
        )
    }
}

/// Get the owner string for locker records.
pub(crate) fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}:{}", user, host, std::process::id())
}
