//! Renaming a single attached file to its suggested name

use crate::error::RenameError;
use crate::file::{AttachedFile, FileLink};
use crate::naming::NameSuggester;
use crate::record::Record;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one rename attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The file was moved; carries the updated reference
    Renamed(AttachedFile),
    /// Nothing was done (already named correctly, or the attempt failed)
    Skipped,
}

/// A move that passed every check but has not been performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    /// Where the file is now
    pub from: PathBuf,
    /// Where it goes
    pub to: PathBuf,
    /// Reference to store once the file has moved
    pub file: AttachedFile,
}

/// Performs one rename attempt for one attached file
#[derive(Clone)]
pub struct SingleFileRenamer {
    suggester: Arc<dyn NameSuggester>,
}

impl SingleFileRenamer {
    pub fn new(suggester: Arc<dyn NameSuggester>) -> Self {
        Self { suggester }
    }

    /// Work out the move for `file`, currently stored at `current`, without
    /// touching the filesystem
    ///
    /// `Ok(None)` means the file already has its suggested name. The planned
    /// reference keeps the shape of the original link: a relative link stays
    /// relative.
    pub fn plan(
        &self,
        file: &AttachedFile,
        record: &Record,
        current: &Path,
    ) -> Result<Option<RenamePlan>, RenameError> {
        let link = match &file.link {
            FileLink::Local(path) => path,
            FileLink::Remote(url) => return Err(RenameError::NotLocal(url.clone())),
        };

        if !current.is_file() {
            return Err(RenameError::NotFound(current.to_path_buf()));
        }

        let suggested = self.suggester.suggest_file_name(file, record)?;
        if current.file_name().and_then(|n| n.to_str()) == Some(suggested.as_str()) {
            debug!("{} already has its suggested name", current.display());
            return Ok(None);
        }

        let target = current.with_file_name(&suggested);
        if target.exists() && !is_same_file(current, &target) {
            return Err(RenameError::TargetExists(target));
        }

        Ok(Some(RenamePlan {
            from: current.to_path_buf(),
            to: target,
            file: file.with_link(FileLink::Local(link.with_file_name(&suggested))),
        }))
    }

    /// Rename `file`, currently stored at `current`, to its suggested name
    ///
    /// Never overwrites another file.
    pub fn try_rename(
        &self,
        file: &AttachedFile,
        record: &Record,
        current: &Path,
    ) -> Result<RenameOutcome, RenameError> {
        match self.plan(file, record, current)? {
            Some(plan) => self.execute(plan).map(RenameOutcome::Renamed),
            None => Ok(RenameOutcome::Skipped),
        }
    }

    /// Perform a planned move, returning the updated reference
    pub fn execute(&self, plan: RenamePlan) -> Result<AttachedFile, RenameError> {
        std::fs::rename(&plan.from, &plan.to).map_err(|source| RenameError::Io {
            path: plan.from.clone(),
            source,
        })?;

        info!("Renamed {} -> {}", plan.from.display(), plan.to.display());
        Ok(plan.file)
    }

    /// Like [`Self::try_rename`], but failures are logged and become `Skipped`
    pub fn attempt_rename(&self, file: &AttachedFile, record: &Record, current: &Path) -> RenameOutcome {
        match self.try_rename(file, record, current) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Could not rename {}: {}", file.link, e);
                RenameOutcome::Skipped
            }
        }
    }
}

/// Both paths name the same file (a case-only rename on a case-insensitive
/// filesystem)
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
