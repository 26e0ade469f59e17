//! Record change notifications

use refile_core::SharedRecord;

/// A record was edited
///
/// Each delivered notification is an independent trigger; nothing is
/// merged by record.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// The changed record
    pub record: SharedRecord,
    /// Name of the changed field, when the source knows it
    pub field: Option<String>,
}

impl ChangeEvent {
    pub fn new(record: SharedRecord) -> Self {
        Self {
            record,
            field: None,
        }
    }

    pub fn for_field(record: SharedRecord, field: impl Into<String>) -> Self {
        Self {
            record,
            field: Some(field.into()),
        }
    }
}
