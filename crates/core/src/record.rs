//! Bibliographic records and their attached files

use crate::file::AttachedFile;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use ulid::Ulid;

/// Record shared between the application and the rename coordinator
pub type SharedRecord = Arc<RwLock<Record>>;

/// A bibliographic entry owning an ordered list of attached files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Stable identity, used to match records across library reloads.
    /// Nil when the library file did not store one.
    #[serde(default = "Ulid::nil")]
    pub id: Ulid,

    /// Citation key; records without one are never renamed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    citation_key: Option<String>,

    /// Entry type ("article", "book", ...)
    #[serde(default)]
    entry_type: String,

    /// Field values keyed by lowercase field name
    #[serde(default)]
    fields: BTreeMap<String, String>,

    /// Attached files in display order
    #[serde(default)]
    files: Vec<AttachedFile>,

    /// Mutation counter (in-memory only)
    #[serde(skip)]
    revision: u64,
}

impl Record {
    /// Create an empty record of the given type
    pub fn new(entry_type: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            citation_key: None,
            entry_type: entry_type.into(),
            fields: BTreeMap::new(),
            files: Vec::new(),
            revision: 0,
        }
    }

    /// Builder-style citation key
    pub fn with_citation_key(mut self, key: impl Into<String>) -> Self {
        self.citation_key = Some(key.into());
        self
    }

    /// Builder-style field
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Builder-style attached file
    pub fn with_file(mut self, file: AttachedFile) -> Self {
        self.files.push(file);
        self
    }

    /// Wrap into a shared handle
    pub fn into_shared(self) -> SharedRecord {
        Arc::new(RwLock::new(self))
    }

    /// Citation key, if set and non-blank
    pub fn citation_key(&self) -> Option<&str> {
        self.citation_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Entry type
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    /// Look up a field value
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// All fields in name order
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Attached files in order
    pub fn files(&self) -> &[AttachedFile] {
        &self.files
    }

    /// Number of mutations applied since this record was loaded
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Set or clear the citation key
    pub fn set_citation_key(&mut self, key: Option<String>) {
        self.citation_key = key;
        self.revision += 1;
    }

    /// Set a field value
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
        self.revision += 1;
    }

    /// Replace the whole attached-file list in one write
    pub fn set_files(&mut self, files: Vec<AttachedFile>) {
        self.files = files;
        self.revision += 1;
    }

    /// Take over the persisted content of `other`, keeping this record's identity
    pub fn replace_content(&mut self, other: Record) {
        self.citation_key = other.citation_key;
        self.entry_type = other.entry_type;
        self.fields = other.fields;
        self.files = other.files;
        self.revision += 1;
    }

    /// Whether the persisted content differs from `other`
    pub fn content_differs(&self, other: &Record) -> bool {
        self.citation_key != other.citation_key
            || self.entry_type != other.entry_type
            || self.fields != other.fields
            || self.files != other.files
    }
}
