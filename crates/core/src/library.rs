//! Library persistence
//!
//! A library is a JSON document holding every record:
//! ```json
//! { "records": [ { "id": "...", "citation_key": "...", "files": [...] } ] }
//! ```

use crate::record::{Record, SharedRecord};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;
use ulid::Ulid;

#[derive(Serialize, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    records: Vec<Record>,
}

/// In-memory library of shared records
#[derive(Default)]
pub struct Library {
    records: Vec<SharedRecord>,
}

impl Library {
    /// Build a library, giving a fresh id to every record stored without one
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|mut record| {
                    if record.id.is_nil() {
                        record.id = Ulid::new();
                    }
                    record.into_shared()
                })
                .collect(),
        }
    }

    /// Load a library file
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(Self::read_records(path)?))
    }

    /// Parse the records stored in a library file
    pub fn read_records(path: &Path) -> Result<Vec<Record>> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read library {}", path.display()))?;
        let file: LibraryFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse library {}", path.display()))?;
        Ok(file.records)
    }

    /// Write the library atomically (temp file in the same directory, then rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = LibraryFile {
            records: self.snapshot(),
        };
        let json = serde_json::to_vec_pretty(&file).context("Failed to serialize library")?;
        atomic_write(path, &json)
    }

    /// Shared handles in library order
    pub fn records(&self) -> &[SharedRecord] {
        &self.records
    }

    /// Owned copy of every record
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.iter().map(|r| r.read().clone()).collect()
    }

    /// Merge records read back from disk
    ///
    /// Records are matched by id. Changed records are updated in place so
    /// existing handles stay valid, new records are appended and records
    /// missing from `incoming` are dropped. Returns the changed and added
    /// records.
    ///
    /// A record stored without an id takes over the identity of an unclaimed
    /// record with the same citation key, then of the unclaimed record at the
    /// same position. Only when neither exists is it treated as new.
    pub fn apply(&mut self, incoming: Vec<Record>) -> Vec<SharedRecord> {
        let order: Vec<Ulid> = self.records.iter().map(|shared| shared.read().id).collect();
        let mut existing: HashMap<Ulid, SharedRecord> = self
            .records
            .drain(..)
            .map(|shared| {
                let id = shared.read().id;
                (id, shared)
            })
            .collect();

        // Ids named explicitly are never handed to an id-less record
        let mut claimed: HashSet<Ulid> = incoming
            .iter()
            .map(|record| record.id)
            .filter(|id| !id.is_nil())
            .collect();

        let mut changed = Vec::new();
        for (index, mut record) in incoming.into_iter().enumerate() {
            if record.id.is_nil() {
                record.id = adopt_id(&record, index, &order, &existing, &claimed);
                claimed.insert(record.id);
            }

            match existing.remove(&record.id) {
                Some(shared) => {
                    let differs = shared.read().content_differs(&record);
                    if differs {
                        shared.write().replace_content(record);
                        changed.push(shared.clone());
                    }
                    self.records.push(shared);
                }
                None => {
                    let shared = record.into_shared();
                    changed.push(shared.clone());
                    self.records.push(shared);
                }
            }
        }

        changed
    }
}

/// Identity for a record read without an id
fn adopt_id(
    record: &Record,
    index: usize,
    order: &[Ulid],
    existing: &HashMap<Ulid, SharedRecord>,
    claimed: &HashSet<Ulid>,
) -> Ulid {
    let free = |id: &Ulid| existing.contains_key(id) && !claimed.contains(id);

    let by_key = record.citation_key().and_then(|key| {
        order
            .iter()
            .filter(|id| free(*id))
            .find(|id| existing[*id].read().citation_key() == Some(key))
            .copied()
    });

    by_key
        .or_else(|| order.get(index).filter(|id| free(*id)).copied())
        .unwrap_or_else(Ulid::new)
}

fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .context("Library path has no file name")?;
    let tmp_path = dir.join(format!(".{}.tmp-{}", name, Ulid::new()));

    let mut tmp = std::fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
    tmp.write_all(data)?;
    tmp.sync_all()?;
    drop(tmp);

    if let Err(e) = std::fs::rename(&tmp_path, target) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("Failed to replace {}", target.display()));
    }
    Ok(())
}
