//! Opening components as lock-holding streams and channels.
//!
//! Each method acquires the group lock first, then opens the component. If
//! opening fails, the lock is released before the error is returned.

use super::{ShpFiles, identifier_to_path};
use crate::catalog::ComponentRole;
use crate::channels::{
    InputStream, OutputStream, ReadChannel, ReadSource, Release, WriteChannel, WriteSink,
};
use crate::error::{Result, ShpFilesError};
use crate::locks::{Access, Requestor};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use tracing::{debug, warn};

impl ShpFiles {
    /// Open `role` as a buffered sequential reader.
    ///
    /// Blocks until the group lock is free. The lock is held until the
    /// stream is closed or dropped.
    pub fn open_input_stream(
        &self,
        role: ComponentRole,
        requestor: &Requestor,
    ) -> Result<InputStream<'_>> {
        let (source, release) = self.open_source(role, requestor)?;
        Ok(InputStream::new(source, release))
    }

    /// Open `role` as a random-access reader.
    ///
    /// Seeking is only supported for local components. Blocks until the
    /// group lock is free; holds it until the channel is closed or dropped.
    pub fn open_read_channel(
        &self,
        role: ComponentRole,
        requestor: &Requestor,
    ) -> Result<ReadChannel<'_>> {
        let (source, release) = self.open_source(role, requestor)?;
        Ok(ReadChannel::new(source, release))
    }

    /// Open `role` as a random-access writer, creating it if needed.
    ///
    /// For local components an exclusive OS advisory lock is also taken on
    /// the file (unless disabled in the config). Existing contents are kept.
    pub fn open_write_channel(
        &self,
        role: ComponentRole,
        requestor: &Requestor,
    ) -> Result<WriteChannel<'_>> {
        let (sink, release) = self.open_sink(role, requestor, false)?;
        Ok(WriteChannel::new(sink, release))
    }

    /// Open `role` as a buffered sequential writer, truncating it.
    ///
    /// Locking is the same as [`open_write_channel`](Self::open_write_channel).
    pub fn open_output_stream(
        &self,
        role: ComponentRole,
        requestor: &Requestor,
    ) -> Result<OutputStream<'_>> {
        let (sink, release) = self.open_sink(role, requestor, true)?;
        Ok(OutputStream::new(sink, release))
    }

    fn open_source(
        &self,
        role: ComponentRole,
        requestor: &Requestor,
    ) -> Result<(ReadSource, Release<'_>)> {
        let identifier = self.acquire(role, requestor, Access::Read)?;
        let release = Release::new(self, role, identifier, requestor.clone(), Access::Read);

        match self.connect_source(release.identifier()) {
            Ok(source) => Ok((source, release)),
            Err(err) => {
                release_after_failure(&release);
                Err(err)
            }
        }
    }

    fn open_sink(
        &self,
        role: ComponentRole,
        requestor: &Requestor,
        truncate: bool,
    ) -> Result<(WriteSink, Release<'_>)> {
        let identifier = self.acquire(role, requestor, Access::Write)?;
        let release = Release::new(self, role, identifier, requestor.clone(), Access::Write);

        match self.connect_sink(release.identifier(), truncate) {
            Ok(sink) => Ok((sink, release)),
            Err(err) => {
                release_after_failure(&release);
                Err(err)
            }
        }
    }

    fn connect_source(&self, identifier: &str) -> Result<ReadSource> {
        if !self.is_local() {
            return self
                .transport
                .open_read(identifier)
                .map(ReadSource::Remote)
                .map_err(|e| {
                    ShpFilesError::io(format!("failed to open '{}' for reading", identifier), e)
                });
        }

        let path = identifier_to_path(identifier)?;
        let file = File::open(&path).map_err(|e| {
            ShpFilesError::io(
                format!("failed to open '{}' for reading", path.display()),
                e,
            )
        })?;
        Ok(ReadSource::Local(file))
    }

    fn connect_sink(&self, identifier: &str, truncate: bool) -> Result<WriteSink> {
        if !self.is_local() {
            return self
                .transport
                .open_write(identifier)
                .map(WriteSink::Remote)
                .map_err(|e| {
                    ShpFilesError::io(format!("failed to open '{}' for writing", identifier), e)
                });
        }

        let path = identifier_to_path(identifier)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                ShpFilesError::io(
                    format!("failed to open '{}' for writing", path.display()),
                    e,
                )
            })?;

        let advisory = self.config().advisory_write_locks;
        if advisory {
            self.lock_advisory(&file).map_err(|e| {
                ShpFilesError::io(
                    format!("failed to take advisory lock on '{}'", path.display()),
                    e,
                )
            })?;
            debug!("Took advisory lock on '{}'", path.display());
        }

        // Truncate only once the advisory lock is held. Dropping `file` on
        // failure closes the descriptor, which drops the advisory lock.
        if truncate {
            file.set_len(0).map_err(|e| {
                ShpFilesError::io(format!("failed to truncate '{}'", path.display()), e)
            })?;
        }

        Ok(WriteSink::Local { file, advisory })
    }

    fn lock_advisory(&self, file: &File) -> io::Result<()> {
        #[cfg(test)]
        if self
            .refuse_advisory_locks
            .load(std::sync::atomic::Ordering::Relaxed)
        {
            return Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "advisory lock refused",
            ));
        }
        file.lock_exclusive()
    }

    /// Make every later advisory lock attempt fail.
    #[cfg(test)]
    pub(crate) fn refuse_advisory_locks(&self, refuse: bool) {
        self.refuse_advisory_locks
            .store(refuse, std::sync::atomic::Ordering::Relaxed);
    }
}

fn release_after_failure(release: &Release<'_>) {
    if let Err(e) = release.close() {
        warn!(
            "Failed to release lock on '{}' after a failed open: {}",
            release.identifier(),
            e
        );
    }
}
