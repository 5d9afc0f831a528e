//! Byte streams and channels opened under the group lock.
//!
//! Every wrapper returned by the `open_*` methods of
//! [`ShpFiles`](crate::files::ShpFiles) holds the set's group lock from the
//! moment it is returned until it is closed. Closing is idempotent: the first
//! `close()` (or the drop, if `close()` was never called) closes the
//! underlying file or stream and releases the lock; later closes do nothing.
//!
//! | Wrapper | Access | Traits |
//! |---|---|---|
//! | [`ReadChannel`] | read | `Read`, `Seek` (local only) |
//! | [`InputStream`] | read | `Read`, `BufRead` |
//! | [`WriteChannel`] | write | `Write`, `Seek` (local only) |
//! | [`OutputStream`] | write | `Write` (truncates on open) |

mod release;
mod source;
mod transport;
mod wrappers;


pub(crate) use release::Release;
pub(crate) use source::{ReadSource, WriteSink};
pub use transport::{HttpTransport, RemoteTransport};
pub use wrappers::{InputStream, OutputStream, ReadChannel, WriteChannel};
