//! Virtual Filesystem abstraction over a flat namespace.
//!
//! Key components:
//!
//! - [`VfsOps`] - Core trait for filesystem operations
//! - [`FlatPath`] - Parser for `/` and `/<name>` paths
//! - [`FlatBackend`] - In-memory backend holding the namespace tables
//!
//! ## Design Decisions
//!
//! - **Path-based, no inodes**: Operations use paths, not inode numbers.
//!   The FUSE adapter handles inode ↔ path mapping locally.
//! - **Explicit offset/size**: Read/write take offset and size, so no
//!   per-handle state lives in the backend.
//! - **Silent misses on I/O**: read and write on a path that names no file
//!   return zero bytes; every other operation reports `NotFound`.

pub mod backends;
mod error;
mod ops;
mod path;
mod types;

pub use backends::FlatBackend;
pub use error::{VfsError, VfsResult};
pub use ops::VfsOps;
pub use path::{FlatPath, MAX_NAME_LEN};
pub use types::{DIR_PERM, DirEntry, FILE_PERM, FileAttr, FileType, StatFs};
