//! `refile clean`

use crate::refile;
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_clean_file_name() -> Result<()> {
    let dir = TempDir::new()?;
    let result = refile!(dir.path(), "clean", r"\textbf{\emph{Nested} content}: a/b").assert_success()?;
    assert_eq!(result.stdout.trim_end(), "Nested content_ a_b");
    Ok(())
}

#[test]
fn test_clean_directory_name_keeps_separators() -> Result<()> {
    let dir = TempDir::new()?;
    let result = refile!(dir.path(), "clean", "--dir", "deep/in/a?tree").assert_success()?;
    assert_eq!(result.stdout.trim_end(), "deep/in/a_tree");
    Ok(())
}
