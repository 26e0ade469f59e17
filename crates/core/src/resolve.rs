//! Locating attached files on disk

use crate::file::AttachedFile;
use crate::record::Record;
use std::path::PathBuf;

/// Finds the current on-disk location of an attached file
pub trait PathResolver: Send + Sync {
    /// Absolute location if the file exists, `None` otherwise
    fn find(&self, file: &AttachedFile, record: &Record) -> Option<PathBuf>;
}

/// Resolves relative links against an ordered list of file directories
#[derive(Debug, Clone, Default)]
pub struct DirectoryResolver {
    roots: Vec<PathBuf>,
}

impl DirectoryResolver {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl PathResolver for DirectoryResolver {
    fn find(&self, file: &AttachedFile, _record: &Record) -> Option<PathBuf> {
        let link = file.link.as_path()?;

        if link.is_absolute() {
            return link.is_file().then(|| link.to_path_buf());
        }

        self.roots
            .iter()
            .map(|root| root.join(link))
            .find(|candidate| candidate.is_file())
    }
}
