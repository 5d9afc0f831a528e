//! shpfiles: resource lifecycle and locking for datasets stored as a group of
//! sidecar files.
//!
//! A dataset such as `roads` lives in several files (`roads.shp`,
//! `roads.dbf`, `roads.shx`, `roads.prj`, ...). [`ShpFiles`] derives every
//! component's identifier from any one of them and serializes access to the
//! whole group behind a single lock.
//!
//! ```no_run
//! use shpfiles::{ComponentRole, Requestor, ShpFiles};
//! use std::io::Read;
//!
//! let files = ShpFiles::new("/data/roads.shp")?;
//! let reader = Requestor::new("attribute-reader");
//!
//! let mut dbf = files.open_input_stream(ComponentRole::Dbf, &reader)?;
//! let mut header = [0u8; 32];
//! dbf.read_exact(&mut header).map_err(|e| shpfiles::ShpFilesError::io("read", e))?;
//! dbf.close()?;
//! # Ok::<(), shpfiles::ShpFilesError>(())
//! ```

pub mod catalog;
pub mod channels;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod files;
pub mod locks;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::ComponentRole;
pub use config::Config;
pub use error::{Result, ShpFilesError};
pub use files::{Acquisition, ShpFiles};
pub use locks::{Access, LockAuditor, Locker, Requestor};
pub use storage::StorageFile;
