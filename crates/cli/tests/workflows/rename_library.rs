//! `refile rename` against a library on disk

use crate::common::TestLibrary;
use crate::refile;
use anyhow::Result;
use std::path::PathBuf;

fn links(records: &[refile_core::Record], index: usize) -> Vec<PathBuf> {
    records[index]
        .files()
        .iter()
        .map(|f| PathBuf::from(f.link.to_string()))
        .collect()
}

#[test]
fn test_rename_updates_files_and_library() -> Result<()> {
    let lib = TestLibrary::new();
    lib.save(vec![
        lib.record(Some("Knuth1984"), &["download.pdf", "papers/scan.djvu"]),
        lib.record(None, &["unkeyed.pdf"]),
    ]);

    let library = lib.library_path();
    let config = lib.config_path();
    let result = refile!(
        lib.root(),
        "--config",
        config.to_str().unwrap(),
        "rename",
        library.to_str().unwrap()
    )
    .assert_success()?;

    assert!(result.contains_stdout("Renamed 2 file(s)"));
    assert!(result.contains_stdout("1 record(s) without citation key"));

    assert!(lib.exists("Knuth1984.pdf"));
    assert!(lib.exists("papers/Knuth1984.djvu"));
    assert!(lib.exists("unkeyed.pdf"));

    let records = lib.load();
    assert_eq!(
        links(&records, 0),
        vec![PathBuf::from("Knuth1984.pdf"), PathBuf::from("papers/Knuth1984.djvu")]
    );
    assert_eq!(links(&records, 1), vec![PathBuf::from("unkeyed.pdf")]);
    Ok(())
}

#[test]
fn test_dry_run_changes_nothing() -> Result<()> {
    let lib = TestLibrary::new();
    lib.save(vec![lib.record(Some("Knuth1984"), &["download.pdf"])]);
    let before = std::fs::read_to_string(lib.library_path())?;

    let library = lib.library_path();
    let config = lib.config_path();
    let result = refile!(
        lib.root(),
        "--config",
        config.to_str().unwrap(),
        "rename",
        library.to_str().unwrap(),
        "--dry-run"
    )
    .assert_success()?;

    assert!(result.contains_stdout("Knuth1984.pdf"));
    assert!(result.contains_stdout("1 file(s) would be renamed"));
    assert!(lib.exists("download.pdf"));
    assert_eq!(std::fs::read_to_string(lib.library_path())?, before);
    Ok(())
}

#[test]
fn test_conflicting_target_is_reported_and_kept() -> Result<()> {
    let lib = TestLibrary::new();
    lib.touch("Knuth1984.pdf");
    lib.save(vec![lib.record(Some("Knuth1984"), &["download.pdf"])]);

    let library = lib.library_path();
    let config = lib.config_path();
    let result = refile!(
        lib.root(),
        "--config",
        config.to_str().unwrap(),
        "rename",
        library.to_str().unwrap()
    )
    .assert_success()?;

    assert!(result.contains_stdout("Renamed 0 file(s)"));
    assert!(result.contains_stdout("1 failure(s)"));
    assert!(lib.exists("download.pdf"));
    assert_eq!(links(&lib.load(), 0), vec![PathBuf::from("download.pdf")]);
    Ok(())
}

#[test]
fn test_library_without_ids_is_renamed_and_gains_ids() -> Result<()> {
    let lib = TestLibrary::new();
    lib.touch("download.pdf");
    std::fs::write(
        lib.library_path(),
        r#"{ "records": [ { "citation_key": "Knuth1984", "files": [ { "link": "download.pdf" } ] } ] }"#,
    )?;

    let library = lib.library_path();
    let config = lib.config_path();
    refile!(
        lib.root(),
        "--config",
        config.to_str().unwrap(),
        "rename",
        library.to_str().unwrap()
    )
    .assert_success()?;

    assert!(lib.exists("Knuth1984.pdf"));
    let saved = refile_core::Library::read_records(&lib.library_path())?;
    assert_eq!(links(&saved, 0), vec![PathBuf::from("Knuth1984.pdf")]);
    assert!(!saved[0].id.is_nil());
    Ok(())
}

#[test]
fn test_missing_library_fails() -> Result<()> {
    let lib = TestLibrary::new();
    let config = lib.config_path();

    let result = refile!(
        lib.root(),
        "--config",
        config.to_str().unwrap(),
        "rename",
        "nope.json"
    )
    .assert_failure()?;

    assert!(result.contains_stderr("Library not found"));
    Ok(())
}

#[test]
fn test_watch_refuses_when_disabled() -> Result<()> {
    let lib = TestLibrary::new();
    lib.save(vec![]);
    std::fs::write(lib.config_path(), "auto_rename_on_change = false\n")?;

    let library = lib.library_path();
    let config = lib.config_path();
    let result = refile!(
        lib.root(),
        "--config",
        config.to_str().unwrap(),
        "watch",
        library.to_str().unwrap()
    )
    .assert_failure()?;

    assert!(result.contains_stderr("Automatic renaming is disabled"));
    Ok(())
}
