//! VFS backend implementations.

mod flat;

pub use flat::FlatBackend;
