//! Configuration management command
//!
//! Provides CLI interface to view and edit the rename configuration.

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use refile_core::config::{self, RenameConfig};
use std::path::Path;

/// List all configuration values
pub fn run_list(config_path: &Path) -> Result<()> {
    let config = RenameConfig::load_from(config_path)?;

    println!("{}", "Rename Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!(
        "  {} = {}",
        "auto_rename_on_change".cyan(),
        config.auto_rename_on_change
    );
    println!(
        "  {} = {} {}",
        "debounce_ms".cyan(),
        config.debounce_ms,
        format!("({:?})", config.debounce()).dimmed()
    );
    println!(
        "  {} = {:?}",
        "file_name_pattern".cyan(),
        config.file_name_pattern
    );
    println!(
        "  {} = {}",
        "file_directories".cyan(),
        if config.file_directories.is_empty() {
            "(library directory)".dimmed().to_string()
        } else {
            dir_list(&config)
        }
    );

    println!("\n{}", "Valid Ranges:".bold());
    println!("  debounce_ms: 0-60,000");
    println!("  file_name_pattern: non-empty");

    Ok(())
}

/// Get a single configuration value
pub fn run_get(config_path: &Path, key: &str) -> Result<()> {
    let config = RenameConfig::load_from(config_path)?;

    let value = match key {
        "auto_rename_on_change" => config.auto_rename_on_change.to_string(),
        "debounce_ms" => config.debounce_ms.to_string(),
        "file_name_pattern" => config.file_name_pattern.clone(),
        "file_directories" => dir_list(&config),
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'refile config list' to see available keys.",
            key
        ),
    };

    println!("{}", value);
    Ok(())
}

/// Set a configuration value
pub fn run_set(config_path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = RenameConfig::load_from(config_path)?;

    match key {
        "auto_rename_on_change" => {
            config.auto_rename_on_change = value
                .parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "debounce_ms" => {
            config.debounce_ms = value
                .parse()
                .context("Invalid value: must be a non-negative integer")?;
        }
        "file_name_pattern" => {
            config.file_name_pattern = value.to_string();
        }
        "file_directories" => {
            config.file_directories = util::parse_dir_list(value);
        }
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'refile config list' to see available keys.",
            key
        ),
    }

    // Validate before saving
    config.validate().context("Invalid configuration value")?;
    config.save_to(config_path)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    println!(
        "{}",
        "Note: Restart 'refile watch' for changes to take effect".yellow()
    );

    Ok(())
}

/// Show the config file path and optionally create it
pub fn run_path(config_path: &Path, create: bool) -> Result<()> {
    if create && !config_path.exists() {
        RenameConfig::default().save_to(config_path)?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else {
        println!("{}", config_path.display());
        if !config_path.exists() {
            println!("{}", "File does not exist. Use --create to create it.".yellow());
        }
    }

    Ok(())
}

/// Show example configuration
pub fn run_example() -> Result<()> {
    println!("{}", config::example_config());
    Ok(())
}

fn dir_list(config: &RenameConfig) -> String {
    config
        .file_directories
        .iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
