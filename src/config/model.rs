//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a locator set.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Take an OS advisory lock on local write channels, in addition to the
    /// in-process group lock.
    #[serde(default = "default_true")]
    pub advisory_write_locks: bool,

    /// Always capture a backtrace as each locker's creation trace. When
    /// false, traces are only captured if `RUST_BACKTRACE` enables them.
    #[serde(default = "default_true")]
    pub capture_traces: bool,

    // =========================================================================
    // Audit settings
    // =========================================================================
    /// Seconds after which the auditor reports a locker as long-held.
    #[serde(default = "default_stale_locker_secs")]
    pub stale_locker_secs: u64,

    /// Seconds between auditor passes.
    #[serde(default = "default_audit_interval_secs")]
    pub audit_interval_secs: u64,

    // =========================================================================
    // I/O settings
    // =========================================================================
    /// Directory for staging files. Defaults to the dataset's directory for
    /// local sets and the system temp directory otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,

    /// Request timeout of the default HTTP transport.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Config {
    /// The stale-locker threshold as a `Duration`.
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_locker_secs)
    }

    /// The auditor interval as a `Duration`.
    pub fn audit_interval(&self) -> Duration {
        Duration::from_secs(self.audit_interval_secs)
    }

    /// The HTTP request timeout as a `Duration`.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advisory_write_locks: default_true(),
            capture_traces: default_true(),
            stale_locker_secs: default_stale_locker_secs(),
            audit_interval_secs: default_audit_interval_secs(),
            staging_dir: None,
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}
