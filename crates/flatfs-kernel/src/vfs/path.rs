//! Single-segment path parsing.
//!
//! The namespace is one level deep, so every valid path is either `/` or
//! `/<name>`. Anything deeper is rejected instead of being misresolved.

use super::error::{VfsError, VfsResult};

/// Longest accepted entry name, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// A parsed path into the flat namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatPath<'a> {
    /// The root directory.
    Root,
    /// A direct child of root.
    Entry(&'a str),
}

impl<'a> FlatPath<'a> {
    /// Parse an absolute path.
    ///
    /// Accepts `/` and `/<name>`, with one optional trailing separator.
    /// Relative, empty, and multi-segment paths are `InvalidPath`, as are
    /// the reserved names `.` and `..` and names containing NUL.
    pub fn parse(path: &'a str) -> VfsResult<Self> {
        let Some(rest) = path.strip_prefix('/') else {
            return Err(VfsError::invalid_path(path));
        };
        if rest.is_empty() {
            return Ok(FlatPath::Root);
        }
        let name = rest.strip_suffix('/').unwrap_or(rest);
        Self::validate_name(name).map_err(|e| match e {
            VfsError::NameTooLong => VfsError::NameTooLong,
            _ => VfsError::invalid_path(path),
        })?;
        Ok(FlatPath::Entry(name))
    }

    /// Check that `name` can be stored as an entry name.
    pub fn validate_name(name: &str) -> VfsResult<()> {
        if name.is_empty() || name == "." || name == ".." {
            return Err(VfsError::invalid_path(name));
        }
        if name.contains('/') || name.contains('\0') {
            return Err(VfsError::invalid_path(name));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(VfsError::NameTooLong);
        }
        Ok(())
    }

    /// The entry name, or `None` for root.
    pub fn name(&self) -> Option<&'a str> {
        match self {
            FlatPath::Root => None,
            FlatPath::Entry(name) => Some(name),
        }
    }

    /// Returns true for `/`.
    pub fn is_root(&self) -> bool {
        matches!(self, FlatPath::Root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root() {
        assert_eq!(FlatPath::parse("/").unwrap(), FlatPath::Root);
        assert!(FlatPath::parse("/").unwrap().is_root());
    }

    #[test]
    fn test_entry() {
        assert_eq!(FlatPath::parse("/docs").unwrap(), FlatPath::Entry("docs"));
        assert_eq!(FlatPath::parse("/docs/").unwrap(), FlatPath::Entry("docs"));
        assert_eq!(FlatPath::parse("/a.txt").unwrap().name(), Some("a.txt"));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "docs", "/a/b", "//", "/a//", "/.", "/..", "/a\0b"] {
            assert!(
                matches!(FlatPath::parse(bad), Err(VfsError::InvalidPath(_))),
                "expected InvalidPath for {bad:?}"
            );
        }
    }

    #[test]
    fn test_name_too_long() {
        let long = format!("/{}", "x".repeat(MAX_NAME_LEN + 1));
        assert_eq!(FlatPath::parse(&long), Err(VfsError::NameTooLong));

        let ok = format!("/{}", "x".repeat(MAX_NAME_LEN));
        assert!(FlatPath::parse(&ok).is_ok());
    }
}
