//! Error types for rename operations

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single file could not be renamed
///
/// These never escape a rename pass; the coordinator records them in its
/// report and passes the original file through unchanged.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The file is a remote link and has no on-disk location
    #[error("not a local file: {0}")]
    NotLocal(String),

    /// The file could not be located under any configured directory
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The name pattern expanded to nothing usable
    #[error("suggested file name is empty")]
    EmptySuggestion,

    /// A different file already occupies the target name
    #[error("target already exists: {}", .0.display())]
    TargetExists(PathBuf),

    /// Filesystem failure while moving the file
    #[error("failed to rename {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
