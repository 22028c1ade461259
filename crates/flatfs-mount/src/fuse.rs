//! FUSE adapter.
//!
//! Translates inode-based kernel requests into path-based [`VfsOps`] calls.
//! Each callback delegates to a `do_*` method returning `Result<_, c_int>`
//! and then sends the reply, which keeps the translation testable without
//! a live mount.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use flatfs_kernel::{FileAttr, FileType, VfsError, VfsOps};
use fuser::{
    KernelConfig, ReplyAttr, ReplyCreate, ReplyData, ReplyDirectory, ReplyEmpty, ReplyEntry,
    ReplyStatfs, ReplyWrite, Request, TimeOrNow,
};
use libc::c_int;
use tracing::{debug, info};

use crate::config::SeedConfig;
use crate::inode::{InodeTable, ROOT_INODE};

/// How long the kernel may cache attributes and entries.
const TTL: Duration = Duration::from_secs(1);

/// Block size reported in attributes.
const BLKSIZE: u32 = 512;

/// Map a VFS error to the errno sent back to the kernel.
pub fn errno(err: &VfsError) -> c_int {
    match err {
        VfsError::NotFound(_) => libc::ENOENT,
        VfsError::AlreadyExists(_) => libc::EEXIST,
        VfsError::NoSpace(_) => libc::ENOSPC,
        VfsError::PermissionDenied(_) => libc::EACCES,
        VfsError::NotADirectory(_) => libc::ENOTDIR,
        VfsError::IsADirectory(_) => libc::EISDIR,
        VfsError::InvalidPath(_) | VfsError::InvalidArgument(_) => libc::EINVAL,
        VfsError::NameTooLong => libc::ENAMETOOLONG,
        VfsError::Other(_) => libc::EIO,
    }
}

fn fail(op: &'static str, path: &str, err: VfsError) -> c_int {
    debug!(op, path, error = %err, "request failed");
    errno(&err)
}

/// FUSE filesystem serving a [`VfsOps`] backend.
pub struct FlatFuse<B: VfsOps> {
    backend: Arc<B>,
    inodes: InodeTable,
    seed: SeedConfig,
    uid: u32,
    gid: u32,
}

impl<B: VfsOps> FlatFuse<B> {
    /// Wrap `backend`; `seed` is applied when the kernel sends `init`.
    ///
    /// Attributes report the current process's uid and gid as owner.
    pub fn new(backend: Arc<B>, seed: SeedConfig) -> Self {
        Self {
            backend,
            inodes: InodeTable::new(),
            seed,
            uid: rustix::process::getuid().as_raw(),
            gid: rustix::process::getgid().as_raw(),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    fn to_fuse_attr(&self, ino: u64, attr: &FileAttr) -> fuser::FileAttr {
        let ctime = attr.ctime.unwrap_or(attr.mtime);
        fuser::FileAttr {
            ino,
            size: attr.size,
            blocks: attr.size.div_ceil(BLKSIZE as u64),
            atime: attr.atime.unwrap_or(attr.mtime),
            mtime: attr.mtime,
            ctime,
            crtime: ctime,
            kind: match attr.kind {
                FileType::Directory => fuser::FileType::Directory,
                FileType::File => fuser::FileType::RegularFile,
            },
            perm: attr.perm as u16,
            nlink: attr.nlink,
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            flags: 0,
            blksize: BLKSIZE,
        }
    }

    fn path_of(&self, ino: u64) -> Result<String, c_int> {
        self.inodes
            .path_for(ino)
            .map(str::to_string)
            .ok_or(libc::ENOENT)
    }

    fn child_of(&self, parent: u64, name: &OsStr) -> Result<String, c_int> {
        let name = name.to_str().ok_or(libc::EINVAL)?;
        self.inodes.child_path(parent, name).ok_or(libc::ENOENT)
    }

    pub(crate) fn do_init(&mut self) -> Result<(), c_int> {
        self.inodes.clear();
        self.backend
            .init(self.seed.name.as_deref(), self.seed.content.as_deref())
            .map_err(|e| fail("init", "/", e))?;
        info!(seed = ?self.seed.name, "filesystem initialized");
        Ok(())
    }

    pub(crate) fn do_destroy(&mut self) {
        self.backend.reset();
        self.inodes.clear();
        info!("filesystem destroyed");
    }

    pub(crate) fn do_lookup(&mut self, parent: u64, name: &OsStr) -> Result<fuser::FileAttr, c_int> {
        // Only root has children, so anything else is a plain miss.
        if parent != ROOT_INODE {
            return Err(libc::ENOENT);
        }
        let path = self.child_of(parent, name)?;
        let attr = self
            .backend
            .getattr(&path)
            .map_err(|e| match e {
                VfsError::InvalidPath(_) => libc::ENOENT,
                e => errno(&e),
            })?;
        let ino = self.inodes.insert(&path);
        Ok(self.to_fuse_attr(ino, &attr))
    }

    pub(crate) fn do_getattr(&self, ino: u64) -> Result<fuser::FileAttr, c_int> {
        let path = self.path_of(ino)?;
        let attr = self.backend.getattr(&path).map_err(|e| fail("getattr", &path, e))?;
        Ok(self.to_fuse_attr(ino, &attr))
    }

    pub(crate) fn do_setattr(&self, ino: u64, size: Option<u64>) -> Result<fuser::FileAttr, c_int> {
        let path = self.path_of(ino)?;
        if let Some(size) = size {
            debug!(path = %path, size, "truncate");
            self.backend
                .truncate(&path, size)
                .map_err(|e| fail("truncate", &path, e))?;
        }
        self.do_getattr(ino)
    }

    /// Listing as `(inode, kind, name)` triples, `.` and `..` first.
    pub(crate) fn do_readdir(&mut self, ino: u64) -> Result<Vec<(u64, fuser::FileType, String)>, c_int> {
        let path = self.path_of(ino)?;
        let entries = self.backend.readdir(&path).map_err(|e| fail("readdir", &path, e))?;

        let mut listing = Vec::with_capacity(entries.len());
        for entry in entries {
            let kind = match entry.kind {
                FileType::Directory => fuser::FileType::Directory,
                FileType::File => fuser::FileType::RegularFile,
            };
            let entry_ino = match entry.name.as_str() {
                "." => ino,
                ".." => ROOT_INODE,
                name => match self.inodes.child_path(ino, name) {
                    Some(child) => self.inodes.insert(&child),
                    None => continue,
                },
            };
            listing.push((entry_ino, kind, entry.name));
        }
        Ok(listing)
    }

    pub(crate) fn do_read(&self, ino: u64, offset: i64, size: u32) -> Result<Vec<u8>, c_int> {
        let offset = u64::try_from(offset).map_err(|_| libc::EINVAL)?;
        let Some(path) = self.inodes.path_for(ino) else {
            return Ok(Vec::new());
        };
        self.backend
            .read(path, offset, size)
            .map_err(|e| fail("read", path, e))
    }

    pub(crate) fn do_write(&self, ino: u64, offset: i64, data: &[u8]) -> Result<u32, c_int> {
        let offset = u64::try_from(offset).map_err(|_| libc::EINVAL)?;
        let Some(path) = self.inodes.path_for(ino) else {
            return Ok(0);
        };
        debug!(path, offset, len = data.len(), "write");
        self.backend
            .write(path, offset, data)
            .map_err(|e| fail("write", path, e))
    }

    pub(crate) fn do_mknod(&mut self, parent: u64, name: &OsStr, mode: u32) -> Result<fuser::FileAttr, c_int> {
        let path = self.child_of(parent, name)?;
        debug!(path = %path, "mknod");
        let attr = self
            .backend
            .create(&path, mode)
            .map_err(|e| fail("mknod", &path, e))?;
        let ino = self.inodes.insert(&path);
        Ok(self.to_fuse_attr(ino, &attr))
    }

    pub(crate) fn do_mkdir(&mut self, parent: u64, name: &OsStr, mode: u32) -> Result<fuser::FileAttr, c_int> {
        let path = self.child_of(parent, name)?;
        debug!(path = %path, "mkdir");
        let attr = self
            .backend
            .mkdir(&path, mode)
            .map_err(|e| fail("mkdir", &path, e))?;
        let ino = self.inodes.insert(&path);
        Ok(self.to_fuse_attr(ino, &attr))
    }

    pub(crate) fn do_unlink(&mut self, parent: u64, name: &OsStr) -> Result<(), c_int> {
        let path = self.child_of(parent, name)?;
        debug!(path = %path, "unlink");
        self.backend.unlink(&path).map_err(|e| fail("unlink", &path, e))?;
        self.inodes.forget(&path);
        Ok(())
    }

    pub(crate) fn do_rmdir(&mut self, parent: u64, name: &OsStr) -> Result<(), c_int> {
        let path = self.child_of(parent, name)?;
        debug!(path = %path, "rmdir");
        self.backend.rmdir(&path).map_err(|e| fail("rmdir", &path, e))?;
        self.inodes.forget(&path);
        Ok(())
    }
}

impl<B: VfsOps> fuser::Filesystem for FlatFuse<B> {
    fn init(&mut self, _req: &Request<'_>, _config: &mut KernelConfig) -> Result<(), c_int> {
        self.do_init()
    }

    fn destroy(&mut self) {
        self.do_destroy();
    }

    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        match self.do_lookup(parent, name) {
            Ok(attr) => reply.entry(&TTL, &attr, 0),
            Err(e) => reply.error(e),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        match self.do_getattr(ino) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(e) => reply.error(e),
        }
    }

    fn setattr(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _mode: Option<u32>,
        _uid: Option<u32>,
        _gid: Option<u32>,
        size: Option<u64>,
        _atime: Option<TimeOrNow>,
        _mtime: Option<TimeOrNow>,
        _ctime: Option<SystemTime>,
        _fh: Option<u64>,
        _crtime: Option<SystemTime>,
        _chgtime: Option<SystemTime>,
        _bkuptime: Option<SystemTime>,
        _flags: Option<u32>,
        reply: ReplyAttr,
    ) {
        match self.do_setattr(ino, size) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(e) => reply.error(e),
        }
    }

    fn mknod(
        &mut self,
        _req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        mode: u32,
        _umask: u32,
        _rdev: u32,
        reply: ReplyEntry,
    ) {
        match self.do_mknod(parent, name, mode) {
            Ok(attr) => reply.entry(&TTL, &attr, 0),
            Err(e) => reply.error(e),
        }
    }

    fn mkdir(
        &mut self,
        _req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        mode: u32,
        _umask: u32,
        reply: ReplyEntry,
    ) {
        match self.do_mkdir(parent, name, mode) {
            Ok(attr) => reply.entry(&TTL, &attr, 0),
            Err(e) => reply.error(e),
        }
    }

    fn unlink(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        match self.do_unlink(parent, name) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(e),
        }
    }

    fn rmdir(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        match self.do_rmdir(parent, name) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(e),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        match self.do_read(ino, offset, size) {
            Ok(data) => reply.data(&data),
            Err(e) => reply.error(e),
        }
    }

    fn write(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        data: &[u8],
        _write_flags: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        match self.do_write(ino, offset, data) {
            Ok(written) => reply.written(written),
            Err(e) => reply.error(e),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let listing = match self.do_readdir(ino) {
            Ok(listing) => listing,
            Err(e) => {
                reply.error(e);
                return;
            }
        };
        let start = offset.max(0) as usize;
        for (idx, (entry_ino, kind, name)) in listing.into_iter().enumerate().skip(start) {
            if reply.add(entry_ino, (idx + 1) as i64, kind, name) {
                break;
            }
        }
        reply.ok();
    }

    fn statfs(&mut self, _req: &Request<'_>, _ino: u64, reply: ReplyStatfs) {
        match self.backend.statfs() {
            Ok(st) => reply.statfs(
                st.blocks, st.bfree, st.bavail, st.files, st.ffree, st.bsize, st.namelen,
                st.frsize,
            ),
            Err(e) => reply.error(fail("statfs", "/", e)),
        }
    }

    fn create(
        &mut self,
        _req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        mode: u32,
        _umask: u32,
        _flags: i32,
        reply: ReplyCreate,
    ) {
        match self.do_mknod(parent, name, mode) {
            Ok(attr) => reply.created(&TTL, &attr, 0, 0, 0),
            Err(e) => reply.error(e),
        }
    }
}
