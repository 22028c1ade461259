//! flatfs mount library
//!
//! FUSE adapter, configuration, and mount helpers around `flatfs-kernel`.

pub mod cli;
pub mod config;
pub mod fuse;
pub mod inode;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use flatfs_kernel::FlatBackend;
use tracing::info;

pub use cli::Cli;
pub use config::{ConfigError, MountConfig, MountOptions, SeedConfig};
pub use fuse::FlatFuse;
pub use inode::{InodeTable, ROOT_INODE};

/// Handle that must be kept as long as the filesystem must
/// remain mounted.
pub struct FuseHandle {
    inner: fuser::BackgroundSession,
}

impl FuseHandle {
    /// Unmount the filesystem and wait for the fuse run loop to stop.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        let Self { inner } = self;
        tokio::task::spawn_blocking(move || inner.join()).await
    }
}

/// Mount a fresh in-memory filesystem at `mountpoint` in a background session.
///
/// The seed file is created when the kernel completes the `init` handshake.
pub fn mount(config: &MountConfig, mountpoint: &Path) -> Result<FuseHandle> {
    let backend = Arc::new(FlatBackend::new(config.limits));
    let filesystem = FlatFuse::new(backend, config.seed.clone());
    let options = config.mount.to_fuser();

    let inner = fuser::spawn_mount2(filesystem, mountpoint, &options)
        .with_context(|| format!("mount {}", mountpoint.display()))?;
    info!(
        mountpoint = %mountpoint.display(),
        fsname = %config.mount.fsname,
        max_file_size = config.limits.max_file_size,
        "mounted"
    );
    Ok(FuseHandle { inner })
}
