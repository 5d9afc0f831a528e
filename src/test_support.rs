use crate::catalog::ComponentRole;
use crate::channels::RemoteTransport;
use crate::config::Config;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Config for tests that take many locks: skip forced backtraces.
pub(crate) fn fast_config() -> Config {
    Config {
        capture_traces: false,
        ..Config::default()
    }
}

/// Create a temp dir holding `name.<ext>` for each role, with the extension as content.
///
/// Returns the temp dir and the path of the geometry component (which may
/// not exist if `Shp` is not among `roles`).
pub(crate) fn create_dataset(name: &str, roles: &[ComponentRole]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    for role in roles {
        let path = temp_dir.path().join(format!("{}.{}", name, role.extension()));
        std::fs::write(&path, role.extension()).unwrap();
    }
    let seed = temp_dir.path().join(format!("{}.shp", name));
    (temp_dir, seed)
}

pub(crate) fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

/// In-memory remote store. Writes become visible once the writer is dropped.
#[derive(Default, Clone)]
pub(crate) struct MemoryTransport {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryTransport {
    pub(crate) fn with_object(self, identifier: &str, bytes: &[u8]) -> Self {
        self.objects
            .lock()
            .insert(identifier.to_string(), bytes.to_vec());
        self
    }

    pub(crate) fn object(&self, identifier: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(identifier).cloned()
    }
}

impl RemoteTransport for MemoryTransport {
    fn open_read(&self, identifier: &str) -> io::Result<Box<dyn Read + Send>> {
        match self.objects.lock().get(identifier) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, identifier.to_string())),
        }
    }

    fn open_write(&self, identifier: &str) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(MemoryWriter {
            identifier: identifier.to_string(),
            buffer: Vec::new(),
            objects: self.objects.clone(),
        }))
    }
}

struct MemoryWriter {
    identifier: String,
    buffer: Vec<u8>,
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        self.objects
            .lock()
            .insert(self.identifier.clone(), std::mem::take(&mut self.buffer));
    }
}

/// Transport whose every open fails.
pub(crate) struct FailingTransport;

impl RemoteTransport for FailingTransport {
    fn open_read(&self, _identifier: &str) -> io::Result<Box<dyn Read + Send>> {
        Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
    }

    fn open_write(&self, _identifier: &str) -> io::Result<Box<dyn Write + Send>> {
        Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
    }
}
