//! Watch a library and rename files as records change

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use refile_core::Library;
use refile_watcher::{DebouncedRenameCoordinator, LibraryWatcher, PassOutcome};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub async fn run(config_path: &Path, library_path: &Path) -> Result<()> {
    let config = util::load_for_library(config_path, library_path)?;
    if !config.auto_rename_on_change {
        anyhow::bail!(
            "Automatic renaming is disabled. Enable it with 'refile config set auto_rename_on_change true'"
        );
    }

    let library = Arc::new(Mutex::new(Library::load(library_path)?));

    let (report_tx, mut report_rx) = mpsc::unbounded_channel();
    let coordinator = {
        let library = Arc::clone(&library);
        let path = library_path.to_path_buf();
        // Saved before the permit is released; the watcher sees this save,
        // finds nothing new and stays quiet
        Arc::new(
            DebouncedRenameCoordinator::from_config(config)
                .with_reports(report_tx)
                .with_write_back(move |_| library.lock().save(&path)),
        )
    };

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let _subscription = coordinator.subscribe(event_rx);

    let watcher = LibraryWatcher::new(library_path.to_path_buf(), Arc::clone(&library), event_tx)
        .with_permit(Arc::clone(coordinator.permit()));
    let mut watch_task = tokio::spawn(watcher.run());

    println!(
        "Watching {} {}",
        library_path.display().cyan(),
        "(Ctrl-C to stop)".dimmed()
    );

    loop {
        tokio::select! {
            Some(report) = report_rx.recv() => {
                for failure in &report.failures {
                    println!("{} {}: {}", "✗".red(), failure.link, failure.error);
                }
                if let PassOutcome::Renamed { count } = report.outcome {
                    println!("{} Renamed {} file(s) of record {}", "✓".green(), count, report.record_id);
                }
            }
            result = &mut watch_task => {
                result.context("Library watcher crashed")??;
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping");
                break;
            }
        }
    }

    Ok(())
}
