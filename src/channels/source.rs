//! The underlying byte sources and sinks behind the wrappers.

use fs2::FileExt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Where reads come from.
pub(crate) enum ReadSource {
    Local(File),
    Remote(Box<dyn Read + Send>),
}

impl Read for ReadSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ReadSource::Local(file) => file.read(buf),
            ReadSource::Remote(stream) => stream.read(buf),
        }
    }
}

impl Seek for ReadSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            ReadSource::Local(file) => file.seek(pos),
            ReadSource::Remote(_) => Err(unsupported("seek on a remote stream")),
        }
    }
}

/// Where writes go.
pub(crate) enum WriteSink {
    /// `advisory` records whether an OS advisory lock is held on `file`.
    Local { file: File, advisory: bool },
    Remote(Box<dyn Write + Send>),
}

impl WriteSink {
    /// Truncate or extend the underlying file.
    pub(crate) fn set_len(&mut self, len: u64) -> io::Result<()> {
        match self {
            WriteSink::Local { file, .. } => file.set_len(len),
            WriteSink::Remote(_) => Err(unsupported("truncate a remote stream")),
        }
    }

    /// Flush, drop the advisory lock and close.
    pub(crate) fn finish(self) -> io::Result<()> {
        match self {
            WriteSink::Local { mut file, advisory } => {
                let flushed = file.flush();
                if advisory {
                    FileExt::unlock(&file)?;
                }
                flushed
            }
            WriteSink::Remote(mut stream) => stream.flush(),
        }
    }
}

impl Write for WriteSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            WriteSink::Local { file, .. } => file.write(buf),
            WriteSink::Remote(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            WriteSink::Local { file, .. } => file.flush(),
            WriteSink::Remote(stream) => stream.flush(),
        }
    }
}

impl Seek for WriteSink {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            WriteSink::Local { file, .. } => file.seek(pos),
            WriteSink::Remote(_) => Err(unsupported("seek on a remote stream")),
        }
    }
}

fn unsupported(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, format!("cannot {}", what))
}
