//! Mount configuration.
//!
//! Loaded from an optional TOML file, then overridden by command-line
//! flags. Every section and field may be omitted:
//!
//! ```toml
//! [seed]
//! name = "readme"
//! content = "hello"
//!
//! [limits]
//! max_file_size = 1024
//! max_entries = 256
//!
//! [mount]
//! fsname = "flatfs"
//! auto_unmount = true
//! allow_other = false
//! ```

use std::path::Path;

use flatfs_kernel::Limits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("max_file_size {0} exceeds the largest supported size of {max} bytes", max = MAX_FILE_SIZE_CAP)]
    FileSizeTooLarge(u64),
}

/// Largest `max_file_size` a mount accepts.
pub const MAX_FILE_SIZE_CAP: u64 = 64 * 1024 * 1024;

/// File created at mount time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Name of the seed file. No seed file when unset.
    pub name: Option<String>,
    /// Initial content of the seed file. Ignored without a name.
    pub content: Option<String>,
}

impl SeedConfig {
    pub fn new(name: Option<&str>, content: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            content: content.map(str::to_string),
        }
    }
}

/// Options passed to the FUSE mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountOptions {
    pub fsname: String,
    pub auto_unmount: bool,
    pub allow_other: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            fsname: "flatfs".to_string(),
            auto_unmount: true,
            allow_other: false,
        }
    }
}

impl MountOptions {
    /// Translate into fuser mount options.
    pub fn to_fuser(&self) -> Vec<fuser::MountOption> {
        let mut options = vec![fuser::MountOption::FSName(self.fsname.clone())];
        if self.auto_unmount {
            options.push(fuser::MountOption::AutoUnmount);
        }
        if self.allow_other {
            options.push(fuser::MountOption::AllowOther);
        }
        options
    }
}

/// Full mount configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub seed: SeedConfig,
    pub limits: Limits,
    pub mount: MountOptions,
}

impl MountConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits the in-memory tables cannot back.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size > MAX_FILE_SIZE_CAP {
            return Err(ConfigError::FileSizeTooLarge(self.limits.max_file_size));
        }
        Ok(())
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }
}
