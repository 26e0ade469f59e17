//! Debounced, single-flight rename coordinator
//!
//! Each change notification schedules its own delayed task. When the delay
//! elapses the task tries to take the process-wide [`RenamePermit`]; if
//! another pass holds it, the trigger is dropped (no retry, no queue). The
//! holder renames every local file of the record and writes the new file
//! list back in a single replacement, only if something changed. An optional
//! write-back hook persists that replacement before the permit is released.
//!
//! ```text
//! Idle --notify--> Scheduled --delay, permit won--> Running --done--> Idle
//!                      |
//!                      +--delay, permit lost--> Idle
//! ```

use crate::event::ChangeEvent;
use crate::permit::RenamePermit;
use parking_lot::RwLock;
use refile_core::{
    AttachedFile, DirectoryResolver, NameSuggester, PathResolver, PatternSuggester, RenameConfig,
    RenamePlan, SharedRecord, SingleFileRenamer,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use ulid::Ulid;

/// How a rename pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Another pass held the permit; nothing was touched
    Contended,
    /// The record has no citation key; nothing was touched
    Unkeyed,
    /// Every file already had its name (or failed); the record was left alone
    Unchanged,
    /// `count` files were moved and the record's file list replaced
    Renamed { count: usize },
    /// Preview only: `count` files would be moved
    Planned { count: usize },
}

/// A file the pass could not rename
#[derive(Debug, Clone)]
pub struct FileFailure {
    /// Position in the record's file list
    pub index: usize,
    /// The file's link as it was before the pass
    pub link: String,
    /// Why it failed
    pub error: String,
}

/// Diagnostics for one rename pass
#[derive(Debug, Clone)]
pub struct PassReport {
    pub record_id: Ulid,
    pub outcome: PassOutcome,
    /// Moves performed (or, in a preview, planned) in file order
    pub renames: Vec<RenamePlan>,
    pub failures: Vec<FileFailure>,
}

impl PassReport {
    fn new(record_id: Ulid, outcome: PassOutcome) -> Self {
        Self {
            record_id,
            outcome,
            renames: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Persists a record after a pass replaced its file list
///
/// Runs on the blocking pool while the permit is still held.
pub type WriteBack = Arc<dyn Fn(&SharedRecord) -> anyhow::Result<()> + Send + Sync>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum PassMode {
    Rename,
    Preview,
}

/// Renames attached files in the background after records change
pub struct DebouncedRenameCoordinator {
    config: Arc<RwLock<RenameConfig>>,
    resolver: Arc<dyn PathResolver>,
    renamer: SingleFileRenamer,
    permit: Arc<RenamePermit>,
    reports: Option<mpsc::UnboundedSender<PassReport>>,
    write_back: Option<WriteBack>,
}

impl DebouncedRenameCoordinator {
    /// Create a coordinator with its own permit
    pub fn new(
        config: Arc<RwLock<RenameConfig>>,
        resolver: Arc<dyn PathResolver>,
        suggester: Arc<dyn NameSuggester>,
    ) -> Self {
        Self {
            config,
            resolver,
            renamer: SingleFileRenamer::new(suggester),
            permit: RenamePermit::new(),
            reports: None,
            write_back: None,
        }
    }

    /// Create a coordinator using the configured directories and name pattern
    pub fn from_config(config: RenameConfig) -> Self {
        let resolver = Arc::new(DirectoryResolver::new(config.file_directories.clone()));
        let suggester = Arc::new(PatternSuggester::new(config.file_name_pattern.clone()));
        Self::new(Arc::new(RwLock::new(config)), resolver, suggester)
    }

    /// Share a permit with other coordinators
    pub fn with_permit(mut self, permit: Arc<RenamePermit>) -> Self {
        self.permit = permit;
        self
    }

    /// Send a report for every scheduled pass to `tx`
    pub fn with_reports(mut self, tx: mpsc::UnboundedSender<PassReport>) -> Self {
        self.reports = Some(tx);
        self
    }

    /// Persist every record whose file list a pass replaced
    ///
    /// The hook runs before the permit is released, so nothing else holding
    /// the permit can observe the new links before they are saved. Failures
    /// are logged; the pass still counts as done.
    pub fn with_write_back<F>(mut self, write_back: F) -> Self
    where
        F: Fn(&SharedRecord) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.write_back = Some(Arc::new(write_back));
        self
    }

    pub fn permit(&self) -> &Arc<RenamePermit> {
        &self.permit
    }

    pub fn config(&self) -> &Arc<RwLock<RenameConfig>> {
        &self.config
    }

    /// Handle one change notification
    ///
    /// Returns the handle of the scheduled task, or `None` when the
    /// notification was discarded. Must be called from within a tokio
    /// runtime.
    pub fn listen(self: &Arc<Self>, event: ChangeEvent) -> Option<JoinHandle<()>> {
        let (enabled, delay) = {
            let config = self.config.read();
            (config.auto_rename_on_change, config.debounce())
        };

        if !enabled {
            return None;
        }

        // Also drops the notification caused by a pass writing back its own list
        if self.permit.is_held() {
            debug!("Change notification dropped: a rename pass is running");
            return None;
        }

        if event.record.read().files().is_empty() {
            return None;
        }

        debug!(
            "Rename of record {} scheduled in {:?} (field: {})",
            event.record.read().id,
            delay,
            event.field.as_deref().unwrap_or("unknown")
        );

        let this = Arc::clone(self);
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let worker = Arc::clone(&this);
            let record = event.record;
            match tokio::task::spawn_blocking(move || worker.run_pass(&record)).await {
                Ok(report) => this.publish(report),
                Err(e) => warn!("Rename pass aborted: {}", e),
            }
        }))
    }

    /// Forward notifications from a channel until it closes
    pub fn subscribe(self: &Arc<Self>, mut rx: mpsc::Receiver<ChangeEvent>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                this.listen(event);
            }
            debug!("Change notification channel closed");
        })
    }

    /// Run one rename pass over `record` right now
    ///
    /// Synchronous; does not wait for the permit. The permit is released when
    /// this returns or unwinds.
    pub fn run_pass(&self, record: &SharedRecord) -> PassReport {
        self.pass(record, PassMode::Rename)
    }

    /// Report what [`Self::run_pass`] would do, without moving anything
    ///
    /// Takes the permit like a real pass, so it reports `Contended` while one
    /// is running.
    pub fn preview_pass(&self, record: &SharedRecord) -> PassReport {
        self.pass(record, PassMode::Preview)
    }

    fn pass(&self, record: &SharedRecord, mode: PassMode) -> PassReport {
        let record_id = record.read().id;

        let Some(_guard) = self.permit.try_acquire() else {
            debug!("Rename pass for {} dropped: another pass holds the permit", record_id);
            return PassReport::new(record_id, PassOutcome::Contended);
        };

        let snapshot = record.read().clone();
        if snapshot.citation_key().is_none() {
            debug!("Rename pass for {} skipped: no citation key", record_id);
            return PassReport::new(record_id, PassOutcome::Unkeyed);
        }

        let mut report = PassReport::new(record_id, PassOutcome::Unchanged);
        let mut updated: Vec<AttachedFile> = Vec::with_capacity(snapshot.files().len());

        for (index, file) in snapshot.files().iter().enumerate() {
            if file.is_online_link() {
                updated.push(file.clone());
                continue;
            }

            let Some(current) = self.resolver.find(file, &snapshot) else {
                debug!("{} not found on disk, leaving link as is", file.link);
                updated.push(file.clone());
                continue;
            };

            let result = self.renamer.plan(file, &snapshot, &current).and_then(|plan| match plan {
                Some(plan) if mode == PassMode::Rename => {
                    let renamed = self.renamer.execute(plan.clone())?;
                    Ok(Some((plan, renamed)))
                }
                Some(plan) => {
                    let renamed = plan.file.clone();
                    Ok(Some((plan, renamed)))
                }
                None => Ok(None),
            });

            match result {
                Ok(Some((plan, renamed))) => {
                    report.renames.push(plan);
                    updated.push(renamed);
                }
                Ok(None) => updated.push(file.clone()),
                Err(e) => {
                    warn!("Could not rename {}: {}", file.link, e);
                    report.failures.push(FileFailure {
                        index,
                        link: file.link.to_string(),
                        error: e.to_string(),
                    });
                    updated.push(file.clone());
                }
            }
        }

        let count = report.renames.len();
        if count == 0 {
            return report;
        }

        if mode == PassMode::Preview {
            report.outcome = PassOutcome::Planned { count };
            return report;
        }

        record.write().set_files(updated);
        info!("Renamed {} file(s) of record {}", count, record_id);
        report.outcome = PassOutcome::Renamed { count };

        if let Some(write_back) = &self.write_back {
            if let Err(e) = write_back(record) {
                warn!("Could not save new links of record {}: {:#}", record_id, e);
            }
        }

        report
    }

    fn publish(&self, report: PassReport) {
        if let Some(tx) = &self.reports {
            // Receiver gone means nobody is listening any more
            let _ = tx.send(report);
        }
    }
}
