//! Acquire and release operations over the group lock.

use super::{Acquisition, ShpFiles};
use crate::catalog::ComponentRole;
use crate::error::{Result, ShpFilesError};
use crate::locks::{Access, Locker, Requestor};
use tracing::trace;

impl ShpFiles {
    /// Block until the group lock is free, take it and return the identifier of `role`.
    ///
    /// The caller must release with [`unlock_read`](Self::unlock_read). Note
    /// that this excludes every other reader and writer of the whole dataset.
    pub fn acquire_read(&self, role: ComponentRole, requestor: &Requestor) -> Result<String> {
        self.acquire(role, requestor, Access::Read)
    }

    /// Block until the group lock is free, take it and return the identifier of `role`.
    ///
    /// The caller must release with [`unlock_write`](Self::unlock_write).
    pub fn acquire_write(&self, role: ComponentRole, requestor: &Requestor) -> Result<String> {
        self.acquire(role, requestor, Access::Write)
    }

    /// Take the group lock for reading `role` if it is free. Never blocks.
    pub fn try_acquire_read(&self, role: ComponentRole, requestor: &Requestor) -> Acquisition {
        self.try_acquire(role, requestor, Access::Read)
    }

    /// Take the group lock for writing `role` if it is free. Never blocks.
    pub fn try_acquire_write(&self, role: ComponentRole, requestor: &Requestor) -> Acquisition {
        self.try_acquire(role, requestor, Access::Write)
    }

    /// Release a read acquisition of `identifier` made by `requestor`.
    ///
    /// # Errors
    ///
    /// `LockMismatch` if `requestor` holds no read acquisition of
    /// `identifier`. Nothing is released in that case.
    pub fn unlock_read(&self, identifier: &str, requestor: &Requestor) -> Result<()> {
        self.unlock(identifier, requestor, Access::Read)
    }

    /// Release a write acquisition of `identifier` made by `requestor`.
    ///
    /// # Errors
    ///
    /// `LockMismatch` if `requestor` holds no write acquisition of
    /// `identifier`. Nothing is released in that case.
    pub fn unlock_write(&self, identifier: &str, requestor: &Requestor) -> Result<()> {
        self.unlock(identifier, requestor, Access::Write)
    }

    pub(crate) fn acquire(
        &self,
        role: ComponentRole,
        requestor: &Requestor,
        access: Access,
    ) -> Result<String> {
        self.group.lock();
        match self.hold(role, requestor, access) {
            Some(identifier) => Ok(identifier),
            None => {
                self.group.unlock();
                Err(ShpFilesError::ResourceAbsent(format!(
                    "no {} component in dataset '{}'",
                    role, self.base
                )))
            }
        }
    }

    fn try_acquire(
        &self,
        role: ComponentRole,
        requestor: &Requestor,
        access: Access,
    ) -> Acquisition {
        if !self.group.try_lock() {
            trace!("{} {} of '{}' is busy", requestor, access, self.base);
            return Acquisition::Busy;
        }
        match self.hold(role, requestor, access) {
            Some(identifier) => Acquisition::Acquired(identifier),
            None => {
                self.group.unlock();
                Acquisition::Absent
            }
        }
    }

    /// With the group lock held, resolve `role` and register the locker.
    fn hold(&self, role: ComponentRole, requestor: &Requestor, access: Access) -> Option<String> {
        let identifier = self.identifiers.get(&role)?;
        self.registry.register(Locker::new(
            identifier,
            requestor,
            access,
            self.config.capture_traces,
        ));
        trace!("{} acquired {} lock on '{}'", requestor, access, identifier);
        Some(identifier.clone())
    }

    pub(crate) fn unlock(
        &self,
        identifier: &str,
        requestor: &Requestor,
        access: Access,
    ) -> Result<()> {
        if self.registry.remove(identifier, requestor, access).is_none() {
            return Err(ShpFilesError::LockMismatch(format!(
                "{} holds no {} lock on '{}'",
                requestor, access, identifier
            )));
        }
        self.group.unlock();
        trace!("{} released {} lock on '{}'", requestor, access, identifier);
        Ok(())
    }

    /// Whether the group lock is currently held. Racy; for tests.
    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.group.is_locked()
    }
}
