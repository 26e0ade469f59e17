//! Attached file references

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where an attached file lives
///
/// Serialized as a plain string; anything that looks like a URL is remote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileLink {
    /// URL-like pointer, never renamed
    Remote(String),
    /// Path, absolute or relative to a configured file directory
    Local(PathBuf),
}

impl FileLink {
    /// Classify a raw link string
    pub fn parse(raw: &str) -> Self {
        if is_remote(raw) {
            Self::Remote(raw.to_string())
        } else {
            Self::Local(PathBuf::from(raw))
        }
    }

    /// Local path, if this is a local link
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }
}

fn is_remote(raw: &str) -> bool {
    let lower = raw.trim().to_ascii_lowercase();
    if lower.starts_with("www.") {
        return true;
    }

    // scheme://... where scheme is at least two letters, so Windows drive
    // letters ("C:\...") stay local
    match lower.split_once("://") {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

impl From<String> for FileLink {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<FileLink> for String {
    fn from(link: FileLink) -> Self {
        link.to_string()
    }
}

impl fmt::Display for FileLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A file attached to a record
///
/// Immutable value: a rename produces a new `AttachedFile` through
/// [`AttachedFile::with_link`] instead of editing this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedFile {
    /// Free-form description shown to the user
    #[serde(default)]
    pub description: String,
    /// Location of the file
    pub link: FileLink,
    /// File type label ("PDF", "DjVu", ...)
    #[serde(default)]
    pub file_type: String,
}

impl AttachedFile {
    /// Create a local file reference
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            description: String::new(),
            link: FileLink::Local(path.into()),
            file_type: String::new(),
        }
    }

    /// Create a remote file reference
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            description: String::new(),
            link: FileLink::Remote(url.into()),
            file_type: String::new(),
        }
    }

    /// Set the file type label
    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    /// Copy of this file pointing at a different location
    pub fn with_link(&self, link: FileLink) -> Self {
        Self {
            description: self.description.clone(),
            link,
            file_type: self.file_type.clone(),
        }
    }

    /// Whether this is a remote link
    pub fn is_online_link(&self) -> bool {
        matches!(self.link, FileLink::Remote(_))
    }

    /// Extension of the linked file, without the dot
    pub fn extension(&self) -> Option<&str> {
        self.link
            .as_path()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
    }
}
