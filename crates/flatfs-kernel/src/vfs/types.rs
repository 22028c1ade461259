//! Core VFS types.
//!
//! Path-based and inode-free; the FUSE adapter attaches inode numbers
//! and ownership on its side.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Permission bits reported for every directory, root included.
pub const DIR_PERM: u32 = 0o755;

/// Permission bits reported for every regular file.
pub const FILE_PERM: u32 = 0o644;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// File attributes (metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttr {
    /// Size in bytes.
    pub size: u64,
    /// File type.
    pub kind: FileType,
    /// Unix permissions (e.g., 0o644).
    pub perm: u32,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Last access time (optional).
    pub atime: Option<SystemTime>,
    /// Creation time (optional).
    pub ctime: Option<SystemTime>,
    /// Number of hard links.
    pub nlink: u32,
}

impl FileAttr {
    /// Attributes for a regular file of `size` bytes.
    pub fn file(size: u64, mtime: SystemTime, ctime: SystemTime) -> Self {
        Self {
            size,
            kind: FileType::File,
            perm: FILE_PERM,
            mtime,
            atime: Some(mtime),
            ctime: Some(ctime),
            nlink: 1,
        }
    }

    /// Attributes for a directory.
    pub fn directory(mtime: SystemTime, ctime: SystemTime) -> Self {
        Self {
            size: 0,
            kind: FileType::Directory,
            perm: DIR_PERM,
            mtime,
            atime: Some(mtime),
            ctime: Some(ctime),
            nlink: 2, // . and ..
        }
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry type.
    pub kind: FileType,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<String>, kind: FileType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, FileType::File)
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, FileType::Directory)
    }
}

/// Filesystem statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatFs {
    /// Total blocks.
    pub blocks: u64,
    /// Free blocks.
    pub bfree: u64,
    /// Available blocks (to non-root).
    pub bavail: u64,
    /// Total inodes.
    pub files: u64,
    /// Free inodes.
    pub ffree: u64,
    /// Block size.
    pub bsize: u32,
    /// Maximum name length.
    pub namelen: u32,
    /// Fragment size.
    pub frsize: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type() {
        assert!(FileType::File.is_file());
        assert!(!FileType::File.is_dir());
        assert!(FileType::Directory.is_dir());
    }

    #[test]
    fn test_file_attr_constructors() {
        let now = SystemTime::now();
        let file = FileAttr::file(5, now, now);
        assert!(file.is_file());
        assert_eq!(file.size, 5);
        assert_eq!(file.perm, 0o644);
        assert_eq!(file.nlink, 1);

        let dir = FileAttr::directory(now, now);
        assert!(dir.is_dir());
        assert_eq!(dir.perm, 0o755);
        assert_eq!(dir.nlink, 2);
    }

    #[test]
    fn test_dir_entry() {
        let file = DirEntry::file("a.txt");
        assert_eq!(file.name, "a.txt");
        assert!(file.kind.is_file());

        let dir = DirEntry::directory("docs");
        assert!(dir.kind.is_dir());
    }
}
