//! VFS operations trait.
//!
//! Path-based with explicit offset/size, so the FUSE layer can keep its own
//! inode ↔ path mapping and call straight through.

use super::types::{DirEntry, FileAttr, StatFs};
use super::VfsResult;

/// Core VFS operations trait.
///
/// Every operation is synchronous and runs to completion as one atomic
/// transaction against the backend's state. Paths are absolute (`/` or
/// `/<name>`).
pub trait VfsOps: Send + Sync {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Reset the namespace and optionally seed one file.
    ///
    /// `seed_content` is ignored when `seed_name` is `None`.
    fn init(&self, seed_name: Option<&str>, seed_content: Option<&str>) -> VfsResult<()>;

    /// Discard every entry.
    fn reset(&self);

    // ========================================================================
    // Reading
    // ========================================================================

    /// Get file attributes.
    fn getattr(&self, path: &str) -> VfsResult<FileAttr>;

    /// Read directory entries, `.` and `..` first.
    fn readdir(&self, path: &str) -> VfsResult<Vec<DirEntry>>;

    /// Read up to `size` bytes starting at `offset`.
    ///
    /// Returns fewer bytes at end of content, and no bytes at all when the
    /// path does not name a file.
    fn read(&self, path: &str, offset: u64, size: u32) -> VfsResult<Vec<u8>>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Write `data` at `offset`, returning the number of bytes stored.
    ///
    /// Returns 0 when the path does not name a file.
    fn write(&self, path: &str, offset: u64, data: &[u8]) -> VfsResult<u32>;

    /// Create a new empty file. The mode is ignored.
    fn create(&self, path: &str, mode: u32) -> VfsResult<FileAttr>;

    /// Create a new directory under root. The mode is ignored.
    fn mkdir(&self, path: &str, mode: u32) -> VfsResult<FileAttr>;

    /// Remove a file.
    fn unlink(&self, path: &str) -> VfsResult<()>;

    /// Remove a directory.
    fn rmdir(&self, path: &str) -> VfsResult<()>;

    /// Truncate or extend a file's backing storage to `size` bytes.
    fn truncate(&self, path: &str, size: u64) -> VfsResult<()>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Get filesystem statistics.
    fn statfs(&self) -> VfsResult<StatFs>;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists.
    fn exists(&self, path: &str) -> bool {
        self.getattr(path).is_ok()
    }

    /// Read entire file contents.
    fn read_all(&self, path: &str) -> VfsResult<Vec<u8>> {
        let attr = self.getattr(path)?;
        self.read(path, 0, attr.size as u32)
    }
}
