//! Outcome of a non-blocking acquisition attempt.

use crate::catalog::ComponentRole;
use crate::error::{Result, ShpFilesError};

/// Result of `try_acquire_read` / `try_acquire_write`.
///
/// Only [`Acquisition::Acquired`] changes state; the caller then owns one
/// acquisition and must release it with the matching `unlock_*`.
#[must_use = "an Acquired outcome holds the group lock until it is unlocked"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// The group lock is now held; carries the component identifier.
    Acquired(String),
    /// The group lock is held elsewhere. Nothing changed.
    Busy,
    /// The role has no identifier in this set. Nothing changed.
    Absent,
}

impl Acquisition {
    pub fn is_acquired(&self) -> bool {
        matches!(self, Acquisition::Acquired(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Acquisition::Busy)
    }

    /// The acquired identifier, if any.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Acquisition::Acquired(id) => Some(id),
            _ => None,
        }
    }

    /// Convert to a `Result`, mapping `Busy` to `LockContention` and `Absent`
    /// to `ResourceAbsent`.
    pub fn into_result(self, role: ComponentRole) -> Result<String> {
        match self {
            Acquisition::Acquired(id) => Ok(id),
            Acquisition::Busy => Err(ShpFilesError::LockContention(format!(
                "{} component is locked by another requestor",
                role
            ))),
            Acquisition::Absent => Err(ShpFilesError::ResourceAbsent(format!(
                "no {} component in this dataset",
                role
            ))),
        }
    }
}
