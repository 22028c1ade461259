//! Directory table: live directories directly under root.

use std::collections::HashMap;
use std::time::SystemTime;

/// Stable handle to a directory slot. Never reused within a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirId(pub usize);

#[derive(Debug)]
struct DirSlot {
    name: String,
    removed: bool,
    ctime: SystemTime,
}

/// Ordered collection of directory names.
///
/// Removal flags the slot instead of rewriting its name, so removed slots
/// never match a lookup and two removals never alias each other.
#[derive(Debug, Default)]
pub struct DirectoryTable {
    slots: Vec<DirSlot>,
    index: HashMap<String, DirId>,
}

impl DirectoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a live directory. The caller checks for name collisions.
    pub fn create(&mut self, name: &str) -> DirId {
        let id = DirId(self.slots.len());
        self.slots.push(DirSlot {
            name: name.to_string(),
            removed: false,
            ctime: SystemTime::now(),
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Flag the live directory called `name` as removed.
    pub fn remove(&mut self, name: &str) -> Option<DirId> {
        let id = self.index.remove(name)?;
        self.slots[id.0].removed = true;
        Some(id)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<DirId> {
        self.index.get(name).copied()
    }

    /// Creation time of a live directory.
    pub fn ctime(&self, id: DirId) -> Option<SystemTime> {
        self.slots
            .get(id.0)
            .filter(|slot| !slot.removed)
            .map(|slot| slot.ctime)
    }

    /// Live directory names in creation order.
    ///
    /// Each call starts a fresh pass over the table.
    pub fn list(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots
            .iter()
            .filter(|slot| !slot.removed)
            .map(|slot| slot.name.as_str())
    }

    /// Number of live directories.
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_list_in_order() {
        let mut dirs = DirectoryTable::new();
        dirs.create("b");
        dirs.create("a");
        dirs.create("c");
        assert_eq!(dirs.list().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(dirs.len(), 3);
    }

    #[test]
    fn test_remove_only_touches_named_entry() {
        let mut dirs = DirectoryTable::new();
        dirs.create("x");
        dirs.create("y");
        dirs.create("z");

        assert!(dirs.remove("x").is_some());
        assert!(dirs.remove("z").is_some());

        assert!(!dirs.exists("x"));
        assert!(dirs.exists("y"));
        assert!(!dirs.exists("z"));
        assert_eq!(dirs.list().collect::<Vec<_>>(), vec!["y"]);
    }

    #[test]
    fn test_removed_entries_never_match() {
        let mut dirs = DirectoryTable::new();
        dirs.create("x");
        dirs.remove("x");
        assert!(dirs.remove("x").is_none());
        assert!(dirs.remove("").is_none());
        assert!(!dirs.exists(""));
    }

    #[test]
    fn test_recreate_gets_new_handle() {
        let mut dirs = DirectoryTable::new();
        let first = dirs.create("x");
        dirs.remove("x");
        let second = dirs.create("x");
        assert_ne!(first, second);
        assert!(dirs.ctime(first).is_none());
        assert!(dirs.ctime(second).is_some());
        assert_eq!(dirs.index_of("x"), Some(second));
    }

    #[test]
    fn test_list_is_restartable() {
        let mut dirs = DirectoryTable::new();
        dirs.create("one");
        dirs.create("two");
        let first: Vec<_> = dirs.list().collect();
        let second: Vec<_> = dirs.list().collect();
        assert_eq!(first, second);
    }
}
