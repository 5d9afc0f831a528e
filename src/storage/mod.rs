//! Staging files for stage-then-swap writes.
//!
//! A writer that rebuilds a component builds the replacement in a
//! [`StorageFile`] first and swaps it in afterwards. Staging files are not
//! part of the locator set's mapping and are not covered by its group lock;
//! each has its own lifetime and the caller deletes it.

#[cfg(test)]
mod tests;

use crate::catalog::ComponentRole;
use crate::error::{Result, ShpFilesError};
use crate::files::ShpFiles;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A uniquely named scratch file for one component role.
#[derive(Debug)]
pub struct StorageFile {
    role: ComponentRole,
    path: PathBuf,
    target: String,
}

impl StorageFile {
    /// Create a new, empty staging file for `role` of `files`.
    ///
    /// The name starts with the dataset's type name and ends with the role's
    /// extension. It lives in the configured staging directory, otherwise next
    /// to the dataset for local sets, otherwise in the system temp directory.
    pub(crate) fn create(files: &ShpFiles, role: ComponentRole) -> Result<Self> {
        let dir = files
            .config()
            .staging_dir
            .clone()
            .or_else(|| files.local_dir())
            .unwrap_or_else(std::env::temp_dir);

        let prefix = format!("{}-", files.type_name());
        let suffix = format!(".{}", role.extension());
        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&dir)
            .map_err(|e| {
                ShpFilesError::io(
                    format!("failed to create staging file in '{}'", dir.display()),
                    e,
                )
            })?;

        let (_file, path) = temp.keep().map_err(|e| {
            ShpFilesError::io("failed to keep staging file".to_string(), e.error)
        })?;
        debug!("Created staging file '{}' for {}", path.display(), role);

        Ok(Self {
            role,
            path,
            target: files.get(role).to_string(),
        })
    }

    pub fn role(&self) -> ComponentRole {
        self.role
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The staging file as an identifier string.
    pub fn identifier(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Identifier of the component this staging file is meant to replace.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Open the staging file for writing. No locking applies.
    pub fn open_write(&self) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| {
                ShpFilesError::io(
                    format!("failed to open staging file '{}'", self.path.display()),
                    e,
                )
            })
    }

    /// Remove the staging file.
    pub fn delete(self) -> Result<()> {
        std::fs::remove_file(&self.path).map_err(|e| {
            ShpFilesError::io(
                format!("failed to delete staging file '{}'", self.path.display()),
                e,
            )
        })
    }
}
