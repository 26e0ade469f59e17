//! Change-driven renaming for Refile
//!
//! This crate provides:
//! - Change notifications for records
//! - A process-wide, non-blocking rename permit
//! - The debounced, single-flight rename coordinator
//! - A library file watcher that turns saves into change notifications

pub mod coordinator;
pub mod event;
pub mod library_watch;
pub mod permit;

// Re-exports
pub use coordinator::{DebouncedRenameCoordinator, FileFailure, PassOutcome, PassReport};
pub use event::ChangeEvent;
pub use library_watch::LibraryWatcher;
pub use permit::{PermitGuard, RenamePermit};
