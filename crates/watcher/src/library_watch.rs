//! Library file watching
//!
//! Watches the directory holding the library file (atomic saves replace the
//! file, so watching the file itself would lose track of it). Every create or
//! modify event for the library reloads it and publishes one
//! [`ChangeEvent`] per record whose content changed.
//!
//! When given the coordinator's permit, a reload waits for any running pass
//! and holds the permit while it reads and merges the file. A pass's new
//! links are then either saved before the reload reads the file or written
//! after the reload finished, never overwritten by the stale copy on disk.

use crate::event::ChangeEvent;
use crate::permit::{PermitGuard, RenamePermit};
use anyhow::{Context, Result};
use notify::{EventKind, RecursiveMode, Watcher};
use parking_lot::Mutex;
use refile_core::Library;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const PERMIT_RETRY: Duration = Duration::from_millis(20);

/// Turns library file saves into change notifications
pub struct LibraryWatcher {
    /// Library file
    path: PathBuf,

    /// In-memory library shared with whoever saves it
    library: Arc<Mutex<Library>>,

    /// Sender for change notifications
    events: mpsc::Sender<ChangeEvent>,

    /// Permit shared with the rename coordinator
    permit: Option<Arc<RenamePermit>>,
}

impl LibraryWatcher {
    pub fn new(path: PathBuf, library: Arc<Mutex<Library>>, events: mpsc::Sender<ChangeEvent>) -> Self {
        Self {
            path,
            library,
            events,
            permit: None,
        }
    }

    /// Serialize reloads with the rename passes holding `permit`
    pub fn with_permit(mut self, permit: Arc<RenamePermit>) -> Self {
        self.permit = Some(permit);
        self
    }

    /// Re-read the library file and publish changed records
    ///
    /// Returns the number of notifications sent. Notifications go out after
    /// the permit is released, so the coordinator does not discard them.
    pub async fn reload(&self) -> Result<usize> {
        let changed = {
            let _guard = self.acquire().await;
            let incoming = Library::read_records(&self.path)?;
            self.library.lock().apply(incoming)
        };

        for record in &changed {
            self.events
                .send(ChangeEvent::new(Arc::clone(record)))
                .await
                .context("Change notification receiver closed")?;
        }
        Ok(changed.len())
    }

    /// Watch until the process exits
    pub async fn run(self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = tx.send(res);
        })
        .context("Failed to create file watcher")?;

        let dir = watch_dir(&self.path);
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        info!("Watching library {}", self.path.display());

        while let Some(res) = rx.recv().await {
            match res {
                Ok(event) if self.is_library_event(&event) => match self.reload().await {
                    Ok(0) => debug!("Library reloaded, no record changed"),
                    Ok(count) => info!("Library reloaded, {} record(s) changed", count),
                    // Usually a save in progress; the next event will catch up
                    Err(e) => warn!("Ignoring unreadable library: {:#}", e),
                },
                Ok(_) => {}
                Err(e) => warn!("File watcher error: {}", e),
            }
        }

        Ok(())
    }

    async fn acquire(&self) -> Option<PermitGuard> {
        let permit = self.permit.as_ref()?;
        loop {
            if let Some(guard) = permit.try_acquire() {
                return Some(guard);
            }
            tokio::time::sleep(PERMIT_RETRY).await;
        }
    }

    fn is_library_event(&self, event: &notify::Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == self.path.file_name())
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
