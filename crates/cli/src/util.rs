//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use refile_core::config::{self, RenameConfig};
use std::path::{Path, PathBuf};

/// Config file to use: the `--config` override or the default location
pub fn config_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path),
        None => config::config_file_path().context("Could not determine config file path"),
    }
}

/// Load the config for working on `library`
///
/// With no file directories configured, relative links resolve against the
/// directory holding the library file.
pub fn load_for_library(config_path: &Path, library: &Path) -> Result<RenameConfig> {
    let mut config = RenameConfig::load_from(config_path)?;

    if config.file_directories.is_empty() {
        let library = library
            .canonicalize()
            .with_context(|| format!("Library not found: {}", library.display()))?;
        if let Some(parent) = library.parent() {
            config.file_directories.push(parent.to_path_buf());
        }
    }

    Ok(config)
}

/// Parse a comma-separated directory list
pub fn parse_dir_list(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
