//! VFS error types.

use std::io;
use thiserror::Error;

/// VFS error type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VfsError {
    /// File or directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Name already used by a directory or a file.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A configured ceiling (file size or entry count) would be exceeded.
    #[error("no space: {0}")]
    NoSpace(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Expected a file.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Malformed or multi-segment path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Request arguments the filesystem cannot represent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// File name too long.
    #[error("file name too long")]
    NameTooLong,

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Create a NoSpace error.
    pub fn no_space(msg: impl Into<String>) -> Self {
        Self::NoSpace(msg.into())
    }

    /// Create a PermissionDenied error.
    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl Into<String>) -> Self {
        Self::IsADirectory(path.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an Other error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            VfsError::AlreadyExists(msg) => io::Error::new(io::ErrorKind::AlreadyExists, msg),
            VfsError::NoSpace(msg) => io::Error::new(io::ErrorKind::StorageFull, msg),
            VfsError::PermissionDenied(msg) => {
                io::Error::new(io::ErrorKind::PermissionDenied, msg)
            }
            VfsError::NotADirectory(msg) => io::Error::new(io::ErrorKind::NotADirectory, msg),
            VfsError::IsADirectory(msg) => io::Error::new(io::ErrorKind::IsADirectory, msg),
            VfsError::InvalidPath(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            VfsError::InvalidArgument(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            VfsError::NameTooLong => {
                io::Error::new(io::ErrorKind::InvalidInput, "file name too long")
            }
            VfsError::Other(msg) => io::Error::other(msg),
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kinds() {
        let e: io::Error = VfsError::not_found("/nope").into();
        assert_eq!(e.kind(), io::ErrorKind::NotFound);

        let e: io::Error = VfsError::no_space("file size 2000 exceeds 1024").into();
        assert_eq!(e.kind(), io::ErrorKind::StorageFull);

        let e: io::Error = VfsError::invalid_path("/a/b").into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidInput);

        let e: io::Error = VfsError::invalid_argument("offset 9 past end 2").into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_display() {
        assert_eq!(VfsError::not_found("/x").to_string(), "not found: /x");
        assert_eq!(VfsError::NameTooLong.to_string(), "file name too long");
    }
}
