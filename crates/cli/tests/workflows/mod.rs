//! Workflow integration tests
//!
//! Tests for complete workflows through the CLI.

pub mod clean_names;
pub mod config_commands;
pub mod rename_library;
