//! Core types and file operations for Refile
//!
//! This crate provides:
//! - Record and attached-file data model
//! - Filename sanitization (LaTeX stripping, illegal character substitution)
//! - Canonical name suggestion from record metadata
//! - Path resolution against configured file directories
//! - Single-file rename with failure containment
//! - Configuration and library persistence

pub mod config;
pub mod error;
pub mod file;
pub mod library;
pub mod naming;
pub mod record;
pub mod rename;
pub mod resolve;
pub mod sanitize;

// Re-exports
pub use config::RenameConfig;
pub use error::RenameError;
pub use file::{AttachedFile, FileLink};
pub use library::Library;
pub use naming::{NameSuggester, PatternSuggester};
pub use record::{Record, SharedRecord};
pub use rename::{RenameOutcome, RenamePlan, SingleFileRenamer};
pub use resolve::{DirectoryResolver, PathResolver};
pub use sanitize::{clean_directory_name, clean_file_name, strip_latex_commands, FileNameCleaner};
