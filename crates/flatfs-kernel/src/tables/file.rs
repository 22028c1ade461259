//! File table: named text buffers directly under root.
//!
//! Content follows NUL-terminated text rules. `length` is the count of
//! meaningful bytes, and every byte of the backing buffer at or after
//! `length` is zero. Writes stop at the first NUL of the input.

use std::collections::HashMap;
use std::time::SystemTime;

use crate::vfs::{VfsError, VfsResult};

/// Ceiling on file content length used when none is configured.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024;

/// Stable handle to a file slot. Never reused within a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub usize);

#[derive(Debug)]
struct FileSlot {
    name: String,
    content: Vec<u8>,
    length: usize,
    removed: bool,
    ctime: SystemTime,
    mtime: SystemTime,
}

impl FileSlot {
    /// Zero-extend the backing buffer to at least `size` bytes.
    ///
    /// Allocation failure is reported as `NoSpace` instead of aborting.
    fn grow_to(&mut self, size: u64) -> VfsResult<usize> {
        let no_space = || VfsError::no_space(format!("cannot hold {size} bytes in {}", self.name));
        let size = usize::try_from(size).map_err(|_| no_space())?;
        if let Some(extra) = size.checked_sub(self.content.len()) {
            self.content.try_reserve_exact(extra).map_err(|_| no_space())?;
            self.content.resize(size, 0);
        }
        Ok(size)
    }
}

/// Metadata snapshot of a live file.
#[derive(Debug, Clone, Copy)]
pub struct FileMeta {
    pub length: u64,
    pub ctime: SystemTime,
    pub mtime: SystemTime,
}

/// Ordered collection of files with a fixed content ceiling.
#[derive(Debug)]
pub struct FileTable {
    slots: Vec<FileSlot>,
    index: HashMap<String, FileId>,
    max_file_size: u64,
}

impl Default for FileTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl FileTable {
    pub fn new(max_file_size: u64) -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            max_file_size,
        }
    }

    /// Append an empty live file. The caller checks for name collisions.
    pub fn create(&mut self, name: &str) -> FileId {
        let id = FileId(self.slots.len());
        let now = SystemTime::now();
        self.slots.push(FileSlot {
            name: name.to_string(),
            content: Vec::new(),
            length: 0,
            removed: false,
            ctime: now,
            mtime: now,
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Flag the live file called `name` as removed and drop its content.
    pub fn remove(&mut self, name: &str) -> Option<FileId> {
        let id = self.index.remove(name)?;
        let slot = &mut self.slots[id.0];
        slot.removed = true;
        slot.content = Vec::new();
        slot.length = 0;
        Some(id)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<FileId> {
        self.index.get(name).copied()
    }

    /// Live file names in creation order.
    pub fn list(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots
            .iter()
            .filter(|slot| !slot.removed)
            .map(|slot| slot.name.as_str())
    }

    pub fn meta(&self, id: FileId) -> VfsResult<FileMeta> {
        let slot = self.slot(id)?;
        Ok(FileMeta {
            length: slot.length as u64,
            ctime: slot.ctime,
            mtime: slot.mtime,
        })
    }

    /// Bytes `[offset, min(offset + max_len, length))`; empty past the end.
    pub fn read(&self, id: FileId, offset: u64, max_len: usize) -> VfsResult<&[u8]> {
        let slot = self.slot(id)?;
        let Ok(start) = usize::try_from(offset) else {
            return Ok(&[]);
        };
        if start >= slot.length {
            return Ok(&[]);
        }
        let end = start.saturating_add(max_len).min(slot.length);
        Ok(&slot.content[start..end])
    }

    /// Write `buf` (up to its first NUL) at `offset`.
    ///
    /// The new length is always `offset + n`: a write at the end grows the
    /// file, a write inside it cuts everything after the written region.
    /// A write starting past the end would leave NULs inside the text and
    /// is rejected with `InvalidArgument`.
    pub fn write(&mut self, id: FileId, offset: u64, buf: &[u8]) -> VfsResult<usize> {
        let max = self.max_file_size;
        let slot = self.slot_mut(id)?;

        let n = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        let end = offset.checked_add(n as u64).filter(|end| *end <= max);
        let Some(end) = end else {
            return Err(VfsError::no_space(format!(
                "write of {n} bytes at offset {offset} exceeds {max} bytes in {}",
                slot.name
            )));
        };
        if offset > slot.length as u64 {
            return Err(VfsError::invalid_argument(format!(
                "offset {offset} is past the end ({}) of {}",
                slot.length, slot.name
            )));
        }
        // offset <= length, so it already fits in usize
        let start = offset as usize;
        let end = slot.grow_to(end)?;

        slot.content[start..end].copy_from_slice(&buf[..n]);
        if end < slot.length {
            slot.content[end..slot.length].fill(0);
        }
        slot.length = end;
        slot.mtime = SystemTime::now();
        Ok(n)
    }

    /// Resize the backing buffer to `new_size` bytes.
    ///
    /// Shrinking below `length` cuts the content. Growing zero-fills the
    /// buffer but leaves `length` alone, so the new region reads as absent.
    pub fn truncate(&mut self, id: FileId, new_size: u64) -> VfsResult<()> {
        let max = self.max_file_size;
        let slot = self.slot_mut(id)?;
        if new_size > max {
            return Err(VfsError::no_space(format!(
                "size {new_size} exceeds {max} bytes in {}",
                slot.name
            )));
        }
        let size = slot.grow_to(new_size)?;
        slot.content.truncate(size);
        slot.length = slot.length.min(size);
        slot.mtime = SystemTime::now();
        Ok(())
    }

    /// Number of live files.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    fn slot(&self, id: FileId) -> VfsResult<&FileSlot> {
        self.slots
            .get(id.0)
            .filter(|slot| !slot.removed)
            .ok_or_else(|| VfsError::not_found(format!("file #{}", id.0)))
    }

    fn slot_mut(&mut self, id: FileId) -> VfsResult<&mut FileSlot> {
        self.slots
            .get_mut(id.0)
            .filter(|slot| !slot.removed)
            .ok_or_else(|| VfsError::not_found(format!("file #{}", id.0)))
    }
}
