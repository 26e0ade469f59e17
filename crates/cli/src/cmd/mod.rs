//! CLI command implementations

pub mod clean;
pub mod config;
pub mod rename;
pub mod watch;
