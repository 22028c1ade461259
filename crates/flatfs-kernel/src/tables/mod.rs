//! Backing tables for the flat namespace.
//!
//! - [`DirectoryTable`] - directory names under root
//! - [`FileTable`] - file names with their text content
//! - [`Namespace`] - both tables plus the limits that span them

mod directory;
mod file;

pub use directory::{DirId, DirectoryTable};
pub use file::{DEFAULT_MAX_FILE_SIZE, FileId, FileMeta, FileTable};

use serde::{Deserialize, Serialize};

use crate::vfs::{VfsError, VfsResult};

/// Capacity limits for a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest content a file may hold, in bytes.
    pub max_file_size: u64,
    /// Largest number of live entries (directories plus files).
    pub max_entries: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_entries: None,
        }
    }
}

/// What a name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Directory(DirId),
    File(FileId),
}

/// Directory and file tables sharing one name space.
#[derive(Debug)]
pub struct Namespace {
    pub dirs: DirectoryTable,
    pub files: FileTable,
    limits: Limits,
}

impl Namespace {
    pub fn new(limits: Limits) -> Self {
        Self {
            dirs: DirectoryTable::new(),
            files: FileTable::new(limits.max_file_size),
            limits,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Resolve a live name; directories are checked first.
    pub fn resolve(&self, name: &str) -> Option<Resolved> {
        if let Some(id) = self.dirs.index_of(name) {
            return Some(Resolved::Directory(id));
        }
        self.files.index_of(name).map(Resolved::File)
    }

    /// Number of live entries across both tables.
    pub fn len(&self) -> usize {
        self.dirs.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }

    /// Check that a new entry called `name` may be added.
    pub fn check_insert(&self, name: &str) -> VfsResult<()> {
        if self.resolve(name).is_some() {
            return Err(VfsError::already_exists(format!("/{name}")));
        }
        if let Some(max) = self.limits.max_entries {
            if self.len() >= max {
                return Err(VfsError::no_space(format!("entry limit {max} reached")));
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.dirs.clear();
        self.files.clear();
    }
}
