//! Locking primitives and bookkeeping for a locator set.
//!
//! Each successful acquisition registers a [`Locker`] in the set's
//! [`LockerRegistry`]. A release must name a registered (identifier,
//! requestor, access) triple or it fails with `LockMismatch`.
//! [`LockAuditor`] only reads the registry.

mod auditor;
mod group;
mod metadata;
mod registry;
mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use auditor::LockAuditor;
pub(crate) use group::GroupLock;
pub use metadata::Locker;
pub use registry::LockerRegistry;
pub use types::{Access, Requestor};
