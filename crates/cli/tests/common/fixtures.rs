//! Test library fixtures

use refile_core::{AttachedFile, Library, Record};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a library, its files and a config file
pub struct TestLibrary {
    dir: TempDir,
}

impl TestLibrary {
    /// Empty library with automatic renaming enabled in its config
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("config.toml"),
            "auto_rename_on_change = true\nfile_name_pattern = \"[citationkey]\"\n",
        )
        .expect("Failed to write config");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn library_path(&self) -> PathBuf {
        self.root().join("library.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config.toml")
    }

    /// Create a file under the library directory
    pub fn touch(&self, name: &str) {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create dirs");
        }
        std::fs::write(path, name.as_bytes()).expect("Failed to write file");
    }

    /// Record with the given key and local files (created on disk)
    pub fn record(&self, key: Option<&str>, files: &[&str]) -> Record {
        let mut record = Record::new("article");
        if let Some(key) = key {
            record = record.with_citation_key(key);
        }
        for name in files {
            self.touch(name);
            record = record.with_file(AttachedFile::local(*name));
        }
        record
    }

    pub fn save(&self, records: Vec<Record>) {
        Library::new(records)
            .save(&self.library_path())
            .expect("Failed to save library");
    }

    pub fn load(&self) -> Vec<Record> {
        Library::load(&self.library_path())
            .expect("Failed to load library")
            .snapshot()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.root().join(name).exists()
    }
}
