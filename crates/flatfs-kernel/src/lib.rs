//! # flatfs-kernel
//!
//! In-memory flat namespace for flatfs.
//!
//! Root holds directories and files directly; nothing nests deeper. The
//! [`FlatBackend`] owns both tables and answers path-based requests through
//! [`VfsOps`], which the FUSE adapter in `flatfs-mount` calls into.

pub mod tables;
pub mod vfs;

pub use tables::{DEFAULT_MAX_FILE_SIZE, Limits};
pub use vfs::{
    DirEntry, FileAttr, FileType, FlatBackend, FlatPath, StatFs, VfsError, VfsOps, VfsResult,
};
