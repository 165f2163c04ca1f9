//! Credential rotation: issue a fresh credential and re-home every
//! config record under it.
//!
//! The remote offers no transactions. Once the reissue call succeeds the
//! old credential is gone, so the run is split into a pre-commit phase
//! where every failure is a clean abort, and a post-commit phase that
//! must run to a terminal state no matter what. Records that were not
//! migrated when a post-commit step fails stay attached to the dead
//! credential; the backup artifact written beforehand is the operator's
//! only way to recover them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clients::{Gateway, GatewayError};
use crate::domain::{NotificationEvent, NotificationSink};
use crate::services::backup::{BackupError, BackupExporter};
use crate::services::migration::ConfigMigrator;
use crate::session::SessionContext;

/// States of one rotation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    Idle,
    Verifying,
    BackingUp,
    Reissuing,
    Migrating(usize),
    Done,
    Aborted,
}

/// Pre-commit failures. Each leaves the account and its records exactly
/// as they were; the whole flow is safe to retry.
#[derive(Debug, Error)]
pub enum RotationError {
    #[error("confirmation does not match the account's current credential")]
    CredentialMismatch,

    #[error("a rotation is already running for account {0}")]
    AlreadyRunning(i64),

    #[error("backup failed: {0}")]
    BackupFailed(#[from] BackupError),

    #[error("credential reissue failed: {0}")]
    ReissueFailed(#[source] GatewayError),
}

/// Outcome of one record within a rotation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Migrated,
    Failed(String),
    NotAttempted,
}

#[derive(Debug, Clone)]
pub struct RecordResult {
    pub id: i64,
    pub name: String,
    pub outcome: MigrationOutcome,
}

/// Terminal status of a committed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStatus {
    Completed,
    /// Migration stopped at `failed_index`; everything after it was
    /// never attempted and is unreachable without manual recovery.
    Halted { failed_index: usize },
}

/// What one committed rotation run produced. The new credential is only
/// surfaced here; it cannot be fetched again through this flow.
#[derive(Debug)]
pub struct RotationReport {
    pub new_credential: String,
    pub backup_path: PathBuf,
    pub records: Vec<RecordResult>,
    pub status: RotationStatus,
}

impl RotationReport {
    #[must_use]
    pub fn migrated_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == MigrationOutcome::Migrated)
            .count()
    }
}

/// Drives the rotation state machine for one account at a time.
pub struct RotationOrchestrator {
    gateway: Arc<dyn Gateway>,
    exporter: BackupExporter,
    migrator: ConfigMigrator,
    sink: Arc<dyn NotificationSink>,
    backup_dir: PathBuf,
    in_flight: Mutex<HashSet<i64>>,
}

/// Marks an account as having a rotation in flight; cleared on drop so
/// early pre-commit returns release it too.
struct RunGuard<'a> {
    in_flight: &'a Mutex<HashSet<i64>>,
    account_id: i64,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.account_id);
    }
}

impl RotationOrchestrator {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn Gateway>,
        sink: Arc<dyn NotificationSink>,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            exporter: BackupExporter::new(Arc::clone(&gateway)),
            migrator: ConfigMigrator::new(Arc::clone(&gateway)),
            gateway,
            sink,
            backup_dir: backup_dir.into(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Runs one rotation for the session's account.
    ///
    /// `confirmation` is the operator's re-entry of the current
    /// credential; it must match before anything touches the network.
    ///
    /// An `Err` means nothing changed remotely. An `Ok` report means the
    /// credential was rotated, whether or not every record made it over;
    /// check [`RotationReport::status`].
    pub async fn rotate(
        &self,
        session: &SessionContext,
        confirmation: &str,
    ) -> Result<RotationReport, RotationError> {
        let account_id = session.account().id;

        debug!(account_id, state = ?RotationState::Verifying, "rotation starting");
        if confirmation != session.credential() {
            warn!(account_id, "rotation rejected: confirmation mismatch");
            return Err(RotationError::CredentialMismatch);
        }

        let _guard = self.acquire(account_id)?;

        debug!(account_id, state = ?RotationState::BackingUp, "capturing snapshot");
        let snapshot = self.exporter.snapshot(session.credential()).await?;
        let backup_path = self.exporter.write(&snapshot, &self.backup_dir)?;
        self.sink.notify(NotificationEvent::BackupCompleted {
            records: snapshot.len(),
            path: backup_path.display().to_string(),
        });

        debug!(account_id, state = ?RotationState::Reissuing, "reissuing credential");
        let account = self
            .gateway
            .reissue_credential(session.credential())
            .await
            .map_err(RotationError::ReissueFailed)?;
        let new_credential = account.config_sync_token;
        self.sink.notify(NotificationEvent::CredentialReissued);

        // Point of no return: the old credential is dead. From here the
        // run always terminates with a report carrying the new one.
        info!(account_id, "credential reissued; migrating {} records", snapshot.len());

        let mut records: Vec<RecordResult> = snapshot
            .records()
            .iter()
            .map(|r| RecordResult {
                id: r.id,
                name: r.name.clone(),
                outcome: MigrationOutcome::NotAttempted,
            })
            .collect();

        let mut status = RotationStatus::Completed;

        for (index, record) in snapshot.records().iter().enumerate() {
            debug!(account_id, state = ?RotationState::Migrating(index), id = record.id);

            match self.migrator.migrate(&new_credential, record).await {
                Ok(_) => {
                    records[index].outcome = MigrationOutcome::Migrated;
                    self.sink.notify(NotificationEvent::RecordMigrated {
                        id: record.id,
                        name: record.name.clone(),
                    });
                }
                Err(e) => {
                    // A failure here usually means the new credential or
                    // the network is broken; pressing on would only grow
                    // the set of unreachable records. Halt and report.
                    warn!(account_id, id = record.id, error = %e, "migration step failed; halting");
                    records[index].outcome = MigrationOutcome::Failed(e.to_string());
                    self.sink.notify(NotificationEvent::RecordMigrationFailed {
                        id: record.id,
                        name: record.name.clone(),
                        message: e.to_string(),
                    });
                    status = RotationStatus::Halted {
                        failed_index: index,
                    };
                    break;
                }
            }
        }

        match status {
            RotationStatus::Completed => {
                debug!(account_id, state = ?RotationState::Done);
                self.sink.notify(NotificationEvent::RotationCompleted {
                    migrated: records.len(),
                });
            }
            RotationStatus::Halted { failed_index } => {
                debug!(account_id, state = ?RotationState::Aborted);
                self.sink.notify(NotificationEvent::RotationHalted {
                    failed_id: records[failed_index].id,
                    failed_name: records[failed_index].name.clone(),
                    stranded: records.len() - failed_index - 1,
                });
            }
        }

        Ok(RotationReport {
            new_credential,
            backup_path,
            records,
            status,
        })
    }

    fn acquire(&self, account_id: i64) -> Result<RunGuard<'_>, RotationError> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !in_flight.insert(account_id) {
            return Err(RotationError::AlreadyRunning(account_id));
        }

        Ok(RunGuard {
            in_flight: &self.in_flight,
            account_id,
        })
    }
}
