use serde::{Deserialize, Serialize};

use super::ConfigRecord;

/// Point-in-time copy of an account's config records, in listing order.
///
/// Serializes as a bare JSON array of records so the artifact can be fed
/// straight back through the import path. Never mutated after capture;
/// it exists as a manual-recovery artifact, nothing in this crate
/// restores from it automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupSnapshot {
    records: Vec<ConfigRecord>,
}

impl BackupSnapshot {
    #[must_use]
    pub const fn new(records: Vec<ConfigRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[ConfigRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
