//! The locator set for one dataset stored as a group of sidecar files.
//!
//! [`ShpFiles`] derives, from a single seed identifier such as
//! `/data/roads.shp`, the identifier of every [`ComponentRole`] of the
//! dataset (`/data/roads.dbf`, `/data/roads.shx`, ...) and coordinates access
//! to them.
//!
//! # Locking
//!
//! The set owns **one** lock for the whole group. Read and write acquisitions
//! of any component contend for it, so two readers of different components
//! (say the geometry and the attribute table) are serialized, not run in
//! parallel. Writers built on top of this type rely on that full
//! serialization for write safety; it is not a reader/writer lock.
//!
//! Every successful `acquire_*` (or `try_acquire_*` returning
//! [`Acquisition::Acquired`]) must be matched by exactly one `unlock_*` with
//! the same identifier and requestor. The stream-opening methods do the
//! pairing for you: the returned wrapper releases the lock on its first
//! [`close`](crate::channels::ReadChannel::close) or when dropped.
//!
//! # Local and remote sets
//!
//! A set is local when its geometry identifier is a plain path or a `file:`
//! URI. Local components are opened as files; local write channels also take
//! an OS advisory lock. Remote components go through a
//! [`RemoteTransport`](crate::channels::RemoteTransport). `exists` and
//! `delete` are only available on local sets.

mod locking;
mod outcome;
mod streams;


pub use outcome::Acquisition;

use crate::catalog::ComponentRole;
use crate::channels::{HttpTransport, RemoteTransport};
use crate::config::Config;
use crate::error::{Result, ShpFilesError};
use crate::locks::{GroupLock, Locker, LockerRegistry};
use crate::storage::StorageFile;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Resource locator set: every component identifier of one dataset, plus the
/// group lock and locker registry that coordinate access to them.
pub struct ShpFiles {
    base: String,
    identifiers: BTreeMap<ComponentRole, String>,
    local: bool,
    config: Config,
    transport: Arc<dyn RemoteTransport>,
    group: GroupLock,
    registry: LockerRegistry,
    #[cfg(test)]
    refuse_advisory_locks: std::sync::atomic::AtomicBool,
}

impl ShpFiles {
    /// Build the set for the dataset that `seed` belongs to, with default config.
    ///
    /// # Arguments
    ///
    /// * `seed` - Path or URI of any one component, e.g. `/data/roads.dbf`
    ///
    /// # Returns
    ///
    /// * `Ok(ShpFiles)` - Identifiers for every role, rooted at the seed's base
    /// * `Err(ShpFilesError::InvalidResource)` - The seed matches no component extension
    pub fn new(seed: impl AsRef<str>) -> Result<Self> {
        Self::with_config(seed, Config::default())
    }

    /// Build the set for the dataset that `seed` belongs to.
    ///
    /// No filesystem access happens here: identifiers are produced for every
    /// role whether or not the file exists. Each identifier is the base plus
    /// `.` plus the role's lowercase extension, whatever the seed's casing.
    pub fn with_config(seed: impl AsRef<str>, config: Config) -> Result<Self> {
        let seed = seed.as_ref();
        let (role, base) = ComponentRole::identify(seed).ok_or_else(|| {
            ShpFilesError::InvalidResource(format!(
                "'{}' does not end in a known component extension",
                seed
            ))
        })?;

        let identifiers = ComponentRole::ALL
            .iter()
            .map(|r| (*r, r.resolve(base)))
            .collect();
        debug!("Resolved dataset '{}' from {} component '{}'", base, role, seed);

        Ok(Self::from_parts(base.to_string(), identifiers, config))
    }

    fn from_parts(
        base: String,
        identifiers: BTreeMap<ComponentRole, String>,
        config: Config,
    ) -> Self {
        let local = identifiers
            .get(&ComponentRole::Shp)
            .map(|id| is_local_identifier(id))
            .unwrap_or_else(|| is_local_identifier(&base));
        let transport: Arc<dyn RemoteTransport> =
            Arc::new(HttpTransport::new(config.http_timeout()));

        Self {
            base,
            identifiers,
            local,
            config,
            transport,
            group: GroupLock::new(),
            registry: LockerRegistry::new(),
            #[cfg(test)]
            refuse_advisory_locks: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Build a set whose catalog covers only some roles.
    #[cfg(test)]
    pub(crate) fn with_partial_catalog(base: &str, roles: &[ComponentRole]) -> Self {
        let identifiers = roles.iter().map(|r| (*r, r.resolve(base))).collect();
        Self::from_parts(base.to_string(), identifiers, Config::default())
    }

    /// Replace the transport used to open non-local components.
    pub fn with_transport(mut self, transport: Arc<dyn RemoteTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Identifier of `role`, whether or not the component exists.
    pub fn get(&self, role: ComponentRole) -> &str {
        self.identifiers
            .get(&role)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Every (role, identifier) pair, in catalog order.
    pub fn identifiers(&self) -> impl Iterator<Item = (ComponentRole, &str)> {
        self.identifiers.iter().map(|(r, id)| (*r, id.as_str()))
    }

    /// The derived base every identifier is rooted at, e.g. `/data/roads`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Dataset name: the last segment of the base, e.g. `roads`.
    pub fn type_name(&self) -> &str {
        self.base
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.base)
    }

    /// Whether the geometry identifier denotes the local filesystem.
    pub fn is_local(&self) -> bool {
        self.local
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn registry(&self) -> &LockerRegistry {
        &self.registry
    }

    /// Whether the component exists on disk.
    ///
    /// # Errors
    ///
    /// `LocalityViolation` if the set is not local.
    pub fn exists(&self, role: ComponentRole) -> Result<bool> {
        self.require_local("exists")?;
        Ok(self.local_path(role)?.exists())
    }

    /// Delete every component file.
    ///
    /// Each role is attempted even after an earlier failure. Components that
    /// do not exist count as removed. Returns `Ok(true)` only if every
    /// removal succeeded. The group lock is not taken.
    ///
    /// # Errors
    ///
    /// `LocalityViolation` if the set is not local.
    pub fn delete(&self) -> Result<bool> {
        self.require_local("delete")?;

        let mut all_removed = true;
        for role in ComponentRole::ALL {
            let path = match self.local_path(role) {
                Ok(path) => path,
                Err(e) => {
                    warn!("Cannot delete {} component: {}", role, e);
                    all_removed = false;
                    continue;
                }
            };
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Deleted '{}'", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Failed to delete '{}': {}", path.display(), e);
                    all_removed = false;
                }
            }
        }
        Ok(all_removed)
    }

    /// Whether the dataset can be written: local, and the geometry file is
    /// either absent or not read-only.
    pub fn is_writable(&self) -> bool {
        if !self.local {
            return false;
        }
        let Ok(path) = self.local_path(ComponentRole::Shp) else {
            return false;
        };
        match std::fs::metadata(&path) {
            Ok(meta) => !meta.permissions().readonly(),
            Err(e) => e.kind() == std::io::ErrorKind::NotFound,
        }
    }

    /// Create a fresh, unlocked staging file for `role`. See [`StorageFile`].
    pub fn storage_file(&self, role: ComponentRole) -> Result<StorageFile> {
        StorageFile::create(self, role)
    }

    /// Number of outstanding acquisitions. Best-effort, for debugging only.
    pub fn lock_count(&self) -> usize {
        self.registry.len()
    }

    /// Snapshot of the outstanding locker records.
    pub fn lockers(&self) -> Vec<Locker> {
        self.registry.snapshot()
    }

    /// Log one line per outstanding locker, including its creation trace.
    pub fn log_current_lockers(&self) {
        self.registry.log_current();
    }

    /// Tear the set down: log every locker still outstanding, then forget
    /// them. Returns how many were reported. A second call reports nothing.
    ///
    /// Called on drop. Locks are not released; an outstanding locker here
    /// is a missing `unlock_*` or `close` in the caller.
    pub fn dispose(&self) -> usize {
        self.registry.report_outstanding(&self.base)
    }

    /// Filesystem path of a component of a local set.
    pub(crate) fn local_path(&self, role: ComponentRole) -> Result<PathBuf> {
        identifier_to_path(self.get(role))
    }

    /// Directory holding the component files of a local set.
    pub(crate) fn local_dir(&self) -> Option<PathBuf> {
        if !self.local {
            return None;
        }
        let path = self.local_path(ComponentRole::Shp).ok()?;
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
            _ => Some(PathBuf::from(".")),
        }
    }

    fn require_local(&self, operation: &str) -> Result<()> {
        if self.local {
            Ok(())
        } else {
            Err(ShpFilesError::LocalityViolation(format!(
                "{} is not available for non-local dataset '{}'",
                operation, self.base
            )))
        }
    }
}

impl Drop for ShpFiles {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ShpFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShpFiles")
            .field("base", &self.base)
            .field("local", &self.local)
            .field("locked", &self.group.is_locked())
            .field("lock_count", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Whether an identifier names the local filesystem.
///
/// Plain paths fail to parse as absolute URLs and are local. `file:` URIs
/// are local, as are single-letter schemes, which are Windows drive letters.
pub(crate) fn is_local_identifier(identifier: &str) -> bool {
    match Url::parse(identifier) {
        Ok(url) => url.scheme() == "file" || url.scheme().len() == 1,
        Err(_) => true,
    }
}

/// Convert a local identifier to a filesystem path.
pub(crate) fn identifier_to_path(identifier: &str) -> Result<PathBuf> {
    match Url::parse(identifier) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().map_err(|_| {
            ShpFilesError::InvalidResource(format!(
                "'{}' is not a valid local file URI",
                identifier
            ))
        }),
        _ => Ok(PathBuf::from(identifier)),
    }
}
