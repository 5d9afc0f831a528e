//! Default values for config fields.

// Default value functions for serde
pub(crate) fn default_true() -> bool {
    true
}
pub(crate) fn default_stale_locker_secs() -> u64 {
    300
}
pub(crate) fn default_audit_interval_secs() -> u64 {
    30
}
pub(crate) fn default_http_timeout_secs() -> u64 {
    30
}
