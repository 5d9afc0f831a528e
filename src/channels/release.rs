//! One-shot release of an acquisition held by a wrapper.

use crate::catalog::ComponentRole;
use crate::error::Result;
use crate::files::ShpFiles;
use crate::locks::{Access, Requestor};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// The acquisition a wrapper was opened under.
///
/// [`close`](Self::close) releases it at most once: the flag is swapped
/// atomically, so racing or repeated closes cannot unlock twice.
pub(crate) struct Release<'a> {
    files: &'a ShpFiles,
    role: ComponentRole,
    identifier: String,
    requestor: Requestor,
    access: Access,
    released: AtomicBool,
}

impl<'a> Release<'a> {
    pub(crate) fn new(
        files: &'a ShpFiles,
        role: ComponentRole,
        identifier: String,
        requestor: Requestor,
        access: Access,
    ) -> Self {
        Self {
            files,
            role,
            identifier,
            requestor,
            access,
            released: AtomicBool::new(false),
        }
    }

    pub(crate) fn role(&self) -> ComponentRole {
        self.role
    }

    pub(crate) fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn requestor(&self) -> &Requestor {
        &self.requestor
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Release the acquisition if this is the first call.
    pub(crate) fn close(&self) -> Result<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.files
            .unlock(&self.identifier, &self.requestor, self.access)
    }
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to release {} lock on '{}': {}", self.access, self.identifier, e);
        }
    }
}
