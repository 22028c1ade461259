//! Inode ↔ path mapping for the FUSE side.

use std::collections::HashMap;

/// Inode number of `/`.
pub const ROOT_INODE: u64 = 1;

/// Assigns inode numbers to paths on first sight.
///
/// Numbers are never reused, so a stale inode held by the kernel after a
/// removal cannot alias a newer entry with the same name.
#[derive(Debug)]
pub struct InodeTable {
    by_inode: HashMap<u64, String>,
    by_path: HashMap<String, u64>,
    next: u64,
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InodeTable {
    pub fn new() -> Self {
        let mut table = Self {
            by_inode: HashMap::new(),
            by_path: HashMap::new(),
            next: ROOT_INODE + 1,
        };
        table.by_inode.insert(ROOT_INODE, "/".to_string());
        table.by_path.insert("/".to_string(), ROOT_INODE);
        table
    }

    /// Inode for `path`, allocating one if needed.
    pub fn insert(&mut self, path: &str) -> u64 {
        if let Some(&inode) = self.by_path.get(path) {
            return inode;
        }
        let inode = self.next;
        self.next += 1;
        self.by_inode.insert(inode, path.to_string());
        self.by_path.insert(path.to_string(), inode);
        inode
    }

    pub fn path_for(&self, inode: u64) -> Option<&str> {
        self.by_inode.get(&inode).map(String::as_str)
    }

    /// Drop the mapping for a removed path.
    pub fn forget(&mut self, path: &str) {
        if let Some(inode) = self.by_path.remove(path) {
            self.by_inode.remove(&inode);
        }
    }

    /// Drop everything except root.
    pub fn clear(&mut self) {
        self.by_inode.retain(|&inode, _| inode == ROOT_INODE);
        self.by_path.retain(|_, &mut inode| inode == ROOT_INODE);
    }

    /// Path of `name` under the directory `parent`.
    pub fn child_path(&self, parent: u64, name: &str) -> Option<String> {
        let parent_path = self.path_for(parent)?;
        Some(if parent_path == "/" {
            format!("/{name}")
        } else {
            format!("{parent_path}/{name}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_preassigned() {
        let table = InodeTable::new();
        assert_eq!(table.path_for(ROOT_INODE), Some("/"));
    }

    #[test]
    fn test_insert_is_stable() {
        let mut table = InodeTable::new();
        let a = table.insert("/a");
        let b = table.insert("/b");
        assert_ne!(a, b);
        assert_eq!(table.insert("/a"), a);
        assert_eq!(table.path_for(b), Some("/b"));
    }

    #[test]
    fn test_forget_never_reuses() {
        let mut table = InodeTable::new();
        let old = table.insert("/a");
        table.forget("/a");
        assert!(table.path_for(old).is_none());

        let new = table.insert("/a");
        assert_ne!(old, new);
    }

    #[test]
    fn test_clear_keeps_root() {
        let mut table = InodeTable::new();
        let a = table.insert("/a");
        table.clear();
        assert!(table.path_for(a).is_none());
        assert_eq!(table.path_for(ROOT_INODE), Some("/"));
        assert_eq!(table.insert("/"), ROOT_INODE);
    }

    #[test]
    fn test_child_path() {
        let mut table = InodeTable::new();
        assert_eq!(table.child_path(ROOT_INODE, "x").as_deref(), Some("/x"));
        let docs = table.insert("/docs");
        assert_eq!(table.child_path(docs, "x").as_deref(), Some("/docs/x"));
        assert!(table.child_path(999, "x").is_none());
    }
}
