//! Lock-holding wrappers around opened sources and sinks.
//!
//! `close` is idempotent and releases the group lock even when flushing
//! fails. Dropping a wrapper closes it.

use super::release::Release;
use super::source::{ReadSource, WriteSink};
use crate::catalog::ComponentRole;
use crate::error::{Result, ShpFilesError};
use crate::locks::Requestor;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use tracing::warn;

fn closed_error(identifier: &str) -> io::Error {
    io::Error::other(format!("'{}' is already closed", identifier))
}

/// Random-access reader over one component, holding the group lock.
pub struct ReadChannel<'a> {
    inner: Option<ReadSource>,
    release: Release<'a>,
}

impl<'a> ReadChannel<'a> {
    pub(crate) fn new(source: ReadSource, release: Release<'a>) -> Self {
        Self {
            inner: Some(source),
            release,
        }
    }

    pub fn role(&self) -> ComponentRole {
        self.release.role()
    }

    pub fn identifier(&self) -> &str {
        self.release.identifier()
    }

    pub fn requestor(&self) -> &Requestor {
        self.release.requestor()
    }

    pub fn is_open(&self) -> bool {
        !self.release.is_released()
    }

    /// Close the source and release the group lock.
    pub fn close(&mut self) -> Result<()> {
        drop(self.inner.take());
        self.release.close()
    }
}

impl Read for ReadChannel<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.as_mut() {
            Some(source) => source.read(buf),
            None => Err(closed_error(self.release.identifier())),
        }
    }
}

impl Seek for ReadChannel<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.inner.as_mut() {
            Some(source) => source.seek(pos),
            None => Err(closed_error(self.release.identifier())),
        }
    }
}

impl Drop for ReadChannel<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close '{}': {}", self.identifier(), e);
        }
    }
}

/// Buffered sequential reader over one component, holding the group lock.
pub struct InputStream<'a> {
    inner: Option<BufReader<ReadSource>>,
    release: Release<'a>,
}

impl<'a> InputStream<'a> {
    pub(crate) fn new(source: ReadSource, release: Release<'a>) -> Self {
        Self {
            inner: Some(BufReader::new(source)),
            release,
        }
    }

    pub fn role(&self) -> ComponentRole {
        self.release.role()
    }

    pub fn identifier(&self) -> &str {
        self.release.identifier()
    }

    pub fn is_open(&self) -> bool {
        !self.release.is_released()
    }

    pub fn close(&mut self) -> Result<()> {
        drop(self.inner.take());
        self.release.close()
    }
}

impl Read for InputStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.as_mut() {
            Some(reader) => reader.read(buf),
            None => Err(closed_error(self.release.identifier())),
        }
    }
}

impl BufRead for InputStream<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self.inner.as_mut() {
            Some(reader) => reader.fill_buf(),
            None => Err(closed_error(self.release.identifier())),
        }
    }

    fn consume(&mut self, amt: usize) {
        if let Some(reader) = self.inner.as_mut() {
            reader.consume(amt);
        }
    }
}

impl Drop for InputStream<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close '{}': {}", self.identifier(), e);
        }
    }
}

/// Random-access writer over one component, holding the group lock and, for
/// local files, an OS advisory lock.
///
/// The file is not truncated on open; use [`set_len`](Self::set_len).
pub struct WriteChannel<'a> {
    inner: Option<WriteSink>,
    release: Release<'a>,
}

impl<'a> WriteChannel<'a> {
    pub(crate) fn new(sink: WriteSink, release: Release<'a>) -> Self {
        Self {
            inner: Some(sink),
            release,
        }
    }

    pub fn role(&self) -> ComponentRole {
        self.release.role()
    }

    pub fn identifier(&self) -> &str {
        self.release.identifier()
    }

    pub fn requestor(&self) -> &Requestor {
        self.release.requestor()
    }

    pub fn is_open(&self) -> bool {
        !self.release.is_released()
    }

    /// Truncate or extend the component. Local files only.
    pub fn set_len(&mut self, len: u64) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(sink) => sink.set_len(len),
            None => Err(closed_error(self.release.identifier())),
        }
    }

    /// Flush and close the sink, then release the group lock.
    pub fn close(&mut self) -> Result<()> {
        let finished = match self.inner.take() {
            Some(sink) => sink.finish().map_err(|e| {
                ShpFilesError::io(format!("failed to close '{}'", self.identifier()), e)
            }),
            None => Ok(()),
        };
        let released = self.release.close();
        finished.and(released)
    }
}

impl Write for WriteChannel<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner.as_mut() {
            Some(sink) => sink.write(buf),
            None => Err(closed_error(self.release.identifier())),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(sink) => sink.flush(),
            None => Err(closed_error(self.release.identifier())),
        }
    }
}

impl Seek for WriteChannel<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.inner.as_mut() {
            Some(sink) => sink.seek(pos),
            None => Err(closed_error(self.release.identifier())),
        }
    }
}

impl Drop for WriteChannel<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close '{}': {}", self.identifier(), e);
        }
    }
}

/// Buffered sequential writer over one component.
///
/// Same locking as [`WriteChannel`]; the component is truncated when opened.
pub struct OutputStream<'a> {
    inner: Option<BufWriter<WriteSink>>,
    release: Release<'a>,
}

impl std::fmt::Debug for OutputStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("identifier", &self.identifier())
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl<'a> OutputStream<'a> {
    pub(crate) fn new(sink: WriteSink, release: Release<'a>) -> Self {
        Self {
            inner: Some(BufWriter::new(sink)),
            release,
        }
    }

    pub fn role(&self) -> ComponentRole {
        self.release.role()
    }

    pub fn identifier(&self) -> &str {
        self.release.identifier()
    }

    pub fn is_open(&self) -> bool {
        !self.release.is_released()
    }

    pub fn close(&mut self) -> Result<()> {
        let flushed = match self.inner.take() {
            Some(writer) => writer
                .into_inner()
                .map_err(|e| e.into_error())
                .and_then(WriteSink::finish),
            None => Ok(()),
        };
        let finished = flushed.map_err(|e| {
            ShpFilesError::io(format!("failed to close '{}'", self.identifier()), e)
        });
        let released = self.release.close();
        finished.and(released)
    }
}

impl Write for OutputStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(closed_error(self.release.identifier())),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(writer) => writer.flush(),
            None => Err(closed_error(self.release.identifier())),
        }
    }
}

impl Drop for OutputStream<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close '{}': {}", self.identifier(), e);
        }
    }
}
