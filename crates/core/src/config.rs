//! Rename configuration
//!
//! Stored as TOML at `<config dir>/refile/config.toml`. A missing file means
//! defaults; an invalid file is an error.

use crate::naming::DEFAULT_FILE_NAME_PATTERN;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "refile";
const CONFIG_FILE_NAME: &str = "config.toml";
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Settings read by the rename coordinator and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameConfig {
    /// Rename attached files automatically when a record changes (default: false)
    #[serde(default)]
    pub auto_rename_on_change: bool,

    /// Quiescence delay before a rename pass starts (default: 500)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Pattern used to build file names (default: "[citationkey] - [title]")
    #[serde(default = "default_file_name_pattern")]
    pub file_name_pattern: String,

    /// Directories that relative file links are resolved against
    #[serde(default)]
    pub file_directories: Vec<PathBuf>,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            auto_rename_on_change: false,
            debounce_ms: default_debounce_ms(),
            file_name_pattern: default_file_name_pattern(),
            file_directories: vec![],
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_file_name_pattern() -> String {
    DEFAULT_FILE_NAME_PATTERN.to_string()
}

impl RenameConfig {
    /// Debounce delay as a `Duration`
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            anyhow::bail!(
                "debounce_ms must be between 0 and {} (got {})",
                MAX_DEBOUNCE_MS,
                self.debounce_ms
            );
        }
        if self.file_name_pattern.trim().is_empty() {
            anyhow::bail!("file_name_pattern must not be empty");
        }
        Ok(())
    }

    /// Load from a specific file, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }
}

/// Default location of the config file
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Annotated example config
pub fn example_config() -> &'static str {
    r#"# Refile configuration

# Rename attached files automatically whenever a record changes
auto_rename_on_change = true

# Wait this long (milliseconds) after the last change before renaming
debounce_ms = 500

# File name pattern; [citationkey], [entrytype] and any field name are
# expanded, optionally with :lower or :upper
file_name_pattern = "[citationkey] - [title]"

# Directories that relative file links are resolved against, in order
file_directories = ["/home/me/papers"]
"#
}
