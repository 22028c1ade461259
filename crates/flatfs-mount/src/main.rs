//! flatfs binary
//!
//! Mounts an in-memory, single-level filesystem and serves it until
//! interrupted.
//!
//! ## Usage
//!
//! ```bash
//! flatfs /mnt/flat
//! flatfs --init=readme --content="hello" /mnt/flat
//! flatfs --config flatfs.toml --max-entries 64 /mnt/flat
//! RUST_LOG=flatfs_mount=debug flatfs /mnt/flat
//! ```

use anyhow::Result;
use clap::Parser;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use flatfs_mount::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.resolve()?;
    if config.seed.name.is_none() && config.seed.content.is_some() {
        warn!("seed content given without a seed name; ignoring it");
    }

    let handle = flatfs_mount::mount(&config, &cli.mountpoint)?;

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = terminate.recv() => {}
    }

    info!(mountpoint = %cli.mountpoint.display(), "unmounting");
    handle.join().await?;
    Ok(())
}
