//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, MountConfig};

/// Mount an in-memory flat filesystem.
#[derive(Parser, Debug)]
#[command(name = "flatfs", version)]
#[command(about = "Mount an in-memory, single-level filesystem via FUSE")]
pub struct Cli {
    /// Directory to mount on
    pub mountpoint: PathBuf,

    /// TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name of a file to create at mount time
    #[arg(long = "init", value_name = "NAME")]
    pub init: Option<String>,

    /// Initial content of the --init file
    #[arg(long, value_name = "TEXT")]
    pub content: Option<String>,

    /// Largest content a file may hold, in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Largest number of entries under root
    #[arg(long, value_name = "COUNT")]
    pub max_entries: Option<usize>,

    /// Filesystem name shown in the mount table
    #[arg(long)]
    pub fsname: Option<String>,

    /// Let other users access the mount
    #[arg(long)]
    pub allow_other: bool,

    /// Leave the mount in place if the process dies
    #[arg(long)]
    pub no_auto_unmount: bool,
}

impl Cli {
    /// Merge the config file (if any) with the flags.
    pub fn resolve(&self) -> Result<MountConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => MountConfig::load(path)?,
            None => MountConfig::default(),
        };

        if let Some(name) = &self.init {
            config.seed.name = Some(name.clone());
        }
        if let Some(content) = &self.content {
            config.seed.content = Some(content.clone());
        }
        if let Some(max) = self.max_file_size {
            config.limits.max_file_size = max;
        }
        if let Some(max) = self.max_entries {
            config.limits.max_entries = Some(max);
        }
        if let Some(fsname) = &self.fsname {
            config.mount.fsname = fsname.clone();
        }
        if self.allow_other {
            config.mount.allow_other = true;
        }
        if self.no_auto_unmount {
            config.mount.auto_unmount = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_seed_flags() {
        let cli = Cli::try_parse_from(["flatfs", "--init=notes", "--content", "hi", "/mnt/x"])
            .unwrap();
        assert_eq!(cli.mountpoint, PathBuf::from("/mnt/x"));

        let config = cli.resolve().unwrap();
        assert_eq!(config.seed.name.as_deref(), Some("notes"));
        assert_eq!(config.seed.content.as_deref(), Some("hi"));
    }

    #[test]
    fn test_mountpoint_required() {
        assert!(Cli::try_parse_from(["flatfs", "--init", "notes"]).is_err());
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = Cli::try_parse_from(["flatfs", "/mnt/x"])
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(config, MountConfig::default());
    }

    #[test]
    fn test_huge_file_size_rejected() {
        let cli = Cli::try_parse_from(["flatfs", "--max-file-size", "18446744073709551615", "/mnt/x"])
            .unwrap();
        assert!(matches!(cli.resolve(), Err(ConfigError::FileSizeTooLarge(_))));
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[seed]\nname = \"from-file\"\ncontent = \"kept\"\n[limits]\nmax_file_size = 64"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from([
            "flatfs",
            "--config",
            path.as_str(),
            "--init",
            "from-flag",
            "--max-entries",
            "4",
            "--no-auto-unmount",
            "/mnt/x",
        ])
        .unwrap();
        let config = cli.resolve().unwrap();
        assert_eq!(config.seed.name.as_deref(), Some("from-flag"));
        assert_eq!(config.seed.content.as_deref(), Some("kept"));
        assert_eq!(config.limits.max_file_size, 64);
        assert_eq!(config.limits.max_entries, Some(4));
        assert!(!config.mount.auto_unmount);
    }
}
