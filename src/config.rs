//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.cladder-stats.toml` files. The dataset's location relative to the
//! project root is fixed; only the root itself can be configured.

use crate::dataset::find_project_root;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".cladder-stats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset location settings.
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Dataset location settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Project root containing `src/dataset/cladder/`.
    ///
    /// A relative path is taken relative to the config file's directory.
    /// When unset, the root is discovered from the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        let resolved = match (&config.dataset.root, path.parent()) {
            (Some(root), Some(base)) if root.is_relative() => Some(base.join(root)),
            _ => None,
        };
        if resolved.is_some() {
            config.dataset.root = resolved;
        }

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref root) = args.root {
            self.dataset.root = Some(root.clone());
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Determine the project root.
    ///
    /// Order: the configured root (CLI `--root` already merged over the
    /// file), then the nearest ancestor of `cwd` holding the dataset, then
    /// `cwd` itself. A relative configured root is taken relative to `cwd`.
    pub fn project_root(&self, cwd: &Path) -> PathBuf {
        if let Some(ref root) = self.dataset.root {
            return cwd.join(root);
        }

        match find_project_root(cwd) {
            Some(root) => {
                debug!("Discovered project root: {}", root.display());
                root
            }
            None => {
                debug!("No dataset found above {}, using it as root", cwd.display());
                cwd.to_path_buf()
            }
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        let config = Config::default();
        toml::to_string_pretty(&config).context("Failed to serialize default config")
    }
}
