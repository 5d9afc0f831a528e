//! Requestor identity and access direction.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REQUESTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Direction of an acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a participant acquiring components.
///
/// Every call to [`Requestor::new`] mints a fresh identity, even for the same
/// name, so two independently created requestors never match each other when
/// releasing. Clones share the identity of the original.
#[derive(Debug, Clone)]
pub struct Requestor {
    id: u64,
    name: Arc<str>,
}

impl Requestor {
    /// Create a new requestor identity with a human-readable name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_REQUESTOR_ID.fetch_add(1, Ordering::Relaxed),
            name: Arc::from(name.into()),
        }
    }

    /// Unique id of this identity.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Name given at creation, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Requestor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Requestor {}

impl std::hash::Hash for Requestor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Requestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}
