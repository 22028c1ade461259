//! In-memory flat filesystem backend.
//!
//! Root plus one level of directories and files. All data is ephemeral and
//! lives for as long as the backend does.

use parking_lot::RwLock;
use std::time::SystemTime;

use crate::tables::{Limits, Namespace, Resolved};
use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::ops::VfsOps;
use crate::vfs::path::{FlatPath, MAX_NAME_LEN};
use crate::vfs::types::{DirEntry, FileAttr, StatFs};

/// Block size reported by `statfs`.
const BLOCK_SIZE: u32 = 512;

/// Inode count reported by `statfs` when no entry limit is configured.
const UNBOUNDED_FILES: u64 = 1024 * 1024;

/// In-memory flat filesystem backend.
///
/// One `RwLock` guards both tables, so every operation sees them
/// consistently. Mutations hold the write lock for their whole duration.
#[derive(Debug)]
pub struct FlatBackend {
    ns: RwLock<Namespace>,
    mounted_at: SystemTime,
}

impl Default for FlatBackend {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl FlatBackend {
    /// Create an empty filesystem with the given limits.
    pub fn new(limits: Limits) -> Self {
        Self {
            ns: RwLock::new(Namespace::new(limits)),
            mounted_at: SystemTime::now(),
        }
    }

    /// Create a filesystem and apply the seed file, if any.
    pub fn with_seed(
        limits: Limits,
        seed_name: Option<&str>,
        seed_content: Option<&str>,
    ) -> VfsResult<Self> {
        let backend = Self::new(limits);
        backend.init(seed_name, seed_content)?;
        Ok(backend)
    }

    fn root_attr(&self) -> FileAttr {
        FileAttr::directory(self.mounted_at, self.mounted_at)
    }

    /// Parse a path that must name an entry rather than root.
    fn entry_name<'a>(path: &'a str, root_err: impl FnOnce() -> VfsError) -> VfsResult<&'a str> {
        match FlatPath::parse(path)? {
            FlatPath::Root => Err(root_err()),
            FlatPath::Entry(name) => Ok(name),
        }
    }
}

impl VfsOps for FlatBackend {
    fn init(&self, seed_name: Option<&str>, seed_content: Option<&str>) -> VfsResult<()> {
        let mut ns = self.ns.write();
        ns.clear();

        let Some(name) = seed_name else {
            return Ok(());
        };
        FlatPath::validate_name(name)?;
        ns.check_insert(name)?;
        let id = ns.files.create(name);
        if let Some(content) = seed_content {
            if let Err(e) = ns.files.write(id, 0, content.as_bytes()) {
                ns.clear();
                return Err(e);
            }
        }
        Ok(())
    }

    fn reset(&self) {
        self.ns.write().clear();
    }

    fn getattr(&self, path: &str) -> VfsResult<FileAttr> {
        let name = match FlatPath::parse(path)? {
            FlatPath::Root => return Ok(self.root_attr()),
            FlatPath::Entry(name) => name,
        };
        let ns = self.ns.read();
        match ns.resolve(name) {
            Some(Resolved::Directory(id)) => {
                let ctime = ns.dirs.ctime(id).unwrap_or(self.mounted_at);
                Ok(FileAttr::directory(ctime, ctime))
            }
            Some(Resolved::File(id)) => {
                let meta = ns.files.meta(id)?;
                Ok(FileAttr::file(meta.length, meta.mtime, meta.ctime))
            }
            None => Err(VfsError::not_found(path)),
        }
    }

    fn readdir(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        let parsed = FlatPath::parse(path)?;
        let ns = self.ns.read();

        if let FlatPath::Entry(name) = parsed {
            match ns.resolve(name) {
                Some(Resolved::Directory(_)) => {}
                Some(Resolved::File(_)) => return Err(VfsError::not_a_directory(path)),
                None => return Err(VfsError::not_found(path)),
            }
        }

        let mut result = vec![DirEntry::directory("."), DirEntry::directory("..")];
        if parsed.is_root() {
            result.reserve(ns.len());
            result.extend(ns.dirs.list().map(DirEntry::directory));
            result.extend(ns.files.list().map(DirEntry::file));
        }
        Ok(result)
    }

    fn read(&self, path: &str, offset: u64, size: u32) -> VfsResult<Vec<u8>> {
        let Some(name) = FlatPath::parse(path)?.name() else {
            return Ok(Vec::new());
        };
        let ns = self.ns.read();
        match ns.files.index_of(name) {
            Some(id) => Ok(ns.files.read(id, offset, size as usize)?.to_vec()),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, path: &str, offset: u64, data: &[u8]) -> VfsResult<u32> {
        let Some(name) = FlatPath::parse(path)?.name() else {
            return Ok(0);
        };
        let mut ns = self.ns.write();
        match ns.files.index_of(name) {
            Some(id) => {
                let written = ns.files.write(id, offset, data)?;
                Ok(written as u32)
            }
            None => Ok(0),
        }
    }

    fn create(&self, path: &str, _mode: u32) -> VfsResult<FileAttr> {
        let name = Self::entry_name(path, || VfsError::already_exists(path))?;
        let mut ns = self.ns.write();
        ns.check_insert(name)?;
        let id = ns.files.create(name);
        let meta = ns.files.meta(id)?;
        Ok(FileAttr::file(0, meta.mtime, meta.ctime))
    }

    fn mkdir(&self, path: &str, _mode: u32) -> VfsResult<FileAttr> {
        let name = Self::entry_name(path, || VfsError::already_exists(path))?;
        let mut ns = self.ns.write();
        ns.check_insert(name)?;
        let id = ns.dirs.create(name);
        let ctime = ns.dirs.ctime(id).unwrap_or(self.mounted_at);
        Ok(FileAttr::directory(ctime, ctime))
    }

    fn unlink(&self, path: &str) -> VfsResult<()> {
        let name = Self::entry_name(path, || VfsError::is_a_directory(path))?;
        let mut ns = self.ns.write();
        match ns.resolve(name) {
            Some(Resolved::File(_)) => {
                ns.files.remove(name);
                Ok(())
            }
            Some(Resolved::Directory(_)) => Err(VfsError::is_a_directory(path)),
            None => Err(VfsError::not_found(path)),
        }
    }

    fn rmdir(&self, path: &str) -> VfsResult<()> {
        let name = Self::entry_name(path, || VfsError::permission_denied("cannot remove root"))?;
        let mut ns = self.ns.write();
        match ns.resolve(name) {
            Some(Resolved::Directory(_)) => {
                ns.dirs.remove(name);
                Ok(())
            }
            Some(Resolved::File(_)) => Err(VfsError::not_a_directory(path)),
            None => Err(VfsError::not_found(path)),
        }
    }

    fn truncate(&self, path: &str, size: u64) -> VfsResult<()> {
        let name = Self::entry_name(path, || VfsError::is_a_directory(path))?;
        let mut ns = self.ns.write();
        match ns.resolve(name) {
            Some(Resolved::File(id)) => ns.files.truncate(id, size),
            Some(Resolved::Directory(_)) => Err(VfsError::is_a_directory(path)),
            None => Err(VfsError::not_found(path)),
        }
    }

    fn statfs(&self) -> VfsResult<StatFs> {
        let ns = self.ns.read();
        let limits = ns.limits();
        let used = ns.len() as u64;
        let files = limits
            .max_entries
            .map_or(UNBOUNDED_FILES, |max| max as u64);
        let per_file = limits.max_file_size.div_ceil(BLOCK_SIZE as u64);
        let blocks = files.saturating_mul(per_file);
        let bfree = files.saturating_sub(used).saturating_mul(per_file);
        Ok(StatFs {
            blocks,
            bfree,
            bavail: bfree,
            files,
            ffree: files.saturating_sub(used),
            bsize: BLOCK_SIZE,
            namelen: MAX_NAME_LEN as u32,
            frsize: BLOCK_SIZE,
        })
    }
}
