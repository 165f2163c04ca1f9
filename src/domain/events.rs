//! Operator-facing notifications.
//!
//! Workflows report progress and outcomes through [`NotificationSink`];
//! the console supplies a printing sink and tests a recording one. The
//! core never decides how a message is displayed.

use serde::Serialize;

/// Events emitted while a workflow runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    BackupCompleted {
        records: usize,
        path: String,
    },

    CredentialReissued,

    RecordMigrated {
        id: i64,
        name: String,
    },
    RecordMigrationFailed {
        id: i64,
        name: String,
        message: String,
    },

    /// Every record was re-homed under the new credential.
    RotationCompleted {
        migrated: usize,
    },
    /// Migration stopped at the named record; `stranded` records stay
    /// attached to the invalidated credential and need manual recovery
    /// from the backup artifact.
    RotationHalted {
        failed_id: i64,
        failed_name: String,
        stranded: usize,
    },

    RecordImported {
        name: String,
    },
    RecordImportFailed {
        name: String,
        message: String,
    },

    Info {
        message: String,
    },
    Error {
        message: String,
    },
}

/// Consumer of workflow notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: NotificationEvent);
}

/// Sink that drops every event. For callers that only care about the
/// returned report.
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: NotificationEvent) {}
}
