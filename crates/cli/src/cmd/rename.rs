//! Rename every attached file of a library in one go

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use refile_core::Library;
use refile_watcher::{DebouncedRenameCoordinator, PassOutcome};
use std::path::Path;

pub async fn run(config_path: &Path, library_path: &Path, dry_run: bool) -> Result<()> {
    let config = util::load_for_library(config_path, library_path)?;
    let library = Library::load(library_path)?;
    let coordinator = DebouncedRenameCoordinator::from_config(config);

    if dry_run {
        preview(&coordinator, &library);
        return Ok(());
    }

    let mut renamed = 0;
    let mut unkeyed = 0;
    let mut failed = 0;

    for record in library.records() {
        let report = coordinator.run_pass(record);
        match report.outcome {
            PassOutcome::Renamed { count } => renamed += count,
            PassOutcome::Unkeyed => unkeyed += 1,
            PassOutcome::Unchanged | PassOutcome::Contended | PassOutcome::Planned { .. } => {}
        }
        for failure in &report.failures {
            failed += 1;
            println!("{} {}: {}", "✗".red(), failure.link, failure.error);
        }
    }

    if renamed > 0 {
        library.save(library_path)?;
    }

    println!(
        "{} Renamed {} file(s){}{}",
        "✓".green(),
        renamed,
        if unkeyed > 0 {
            format!(", {} record(s) without citation key", unkeyed).dimmed().to_string()
        } else {
            String::new()
        },
        if failed > 0 {
            format!(", {} failure(s)", failed).red().to_string()
        } else {
            String::new()
        }
    );

    Ok(())
}

/// Print the renames a pass would perform
fn preview(coordinator: &DebouncedRenameCoordinator, library: &Library) {
    let mut pending = 0;

    for record in library.records() {
        let report = coordinator.preview_pass(record);
        for plan in &report.renames {
            pending += 1;
            println!(
                "{} -> {}",
                file_name(&plan.from).dimmed(),
                file_name(&plan.to).cyan()
            );
        }
    }

    println!("{} file(s) would be renamed", pending);
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
