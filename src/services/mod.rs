pub mod backup;
pub use backup::{BackupError, BackupExporter};

pub mod migration;
pub use migration::ConfigMigrator;

pub mod rotation;
pub use rotation::{
    MigrationOutcome, RecordResult, RotationError, RotationOrchestrator, RotationReport,
    RotationState, RotationStatus,
};

pub mod transfer;
pub use transfer::{FailedImport, ImportReport, TransferError, TransferService};
