//! `refile config`

use crate::refile;
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_set_then_get() -> Result<()> {
    let dir = TempDir::new()?;
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();

    refile!(dir.path(), "--config", config, "config", "set", "debounce_ms", "250").assert_success()?;
    let result = refile!(dir.path(), "--config", config, "config", "get", "debounce_ms").assert_success()?;
    assert_eq!(result.stdout.trim_end(), "250");

    let saved = std::fs::read_to_string(dir.path().join("config.toml"))?;
    assert!(saved.contains("debounce_ms = 250"));
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();

    refile!(dir.path(), "--config", config, "config", "set", "debounce_ms", "999999").assert_failure()?;
    refile!(dir.path(), "--config", config, "config", "set", "auto_rename_on_change", "maybe").assert_failure()?;
    refile!(dir.path(), "--config", config, "config", "get", "no_such_key").assert_failure()?;
    assert!(!dir.path().join("config.toml").exists());
    Ok(())
}

#[test]
fn test_path_create() -> Result<()> {
    let dir = TempDir::new()?;
    let config = dir.path().join("nested/config.toml");
    let config_str = config.to_str().unwrap();

    let result = refile!(dir.path(), "--config", config_str, "config", "path").assert_success()?;
    assert!(result.contains_stdout("File does not exist"));

    refile!(dir.path(), "--config", config_str, "config", "path", "--create").assert_success()?;
    assert!(config.exists());
    Ok(())
}
