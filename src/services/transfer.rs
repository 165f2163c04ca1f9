//! Ad-hoc export/import of config records as JSON artifacts, and raw
//! download of a single record's content.
//!
//! Import recreates records one element at a time: create under the
//! element's name first, then patch the fresh record with its content
//! and version tag. Unlike rotation this path is never post-commit, so
//! a failing element is collected and the rest of the file proceeds.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::clients::{Gateway, GatewayError};
use crate::domain::{NotificationEvent, NotificationSink};
use crate::models::{BackupSnapshot, ConfigRecord};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("config list could not be fetched: {0}")]
    List(#[source] GatewayError),

    #[error("record could not be fetched: {0}")]
    Fetch(#[source] GatewayError),

    #[error("artifact is not a valid config export: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

/// One element that could not be recreated, with the failure message.
#[derive(Debug, Clone)]
pub struct FailedImport {
    pub name: String,
    pub error: String,
}

/// Collected results of one import run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<ConfigRecord>,
    pub failed: Vec<FailedImport>,
}

pub struct TransferService {
    gateway: Arc<dyn Gateway>,
    sink: Arc<dyn NotificationSink>,
}

impl TransferService {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { gateway, sink }
    }

    /// Writes the account's full record list to `path` as a JSON array.
    pub async fn export_to_file(
        &self,
        credential: &str,
        path: &Path,
    ) -> Result<BackupSnapshot, TransferError> {
        let records = self
            .gateway
            .list_configs(credential)
            .await
            .map_err(TransferError::List)?;
        let snapshot = BackupSnapshot::new(records);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;

        info!(records = snapshot.len(), path = %path.display(), "exported configs");
        Ok(snapshot)
    }

    /// Recreates every record found in the artifact at `path`.
    ///
    /// A file that does not parse as a record array fails as a whole;
    /// per-element remote failures are collected into the report.
    pub async fn import_from_file(
        &self,
        credential: &str,
        path: &Path,
    ) -> Result<ImportReport, TransferError> {
        let data = std::fs::read_to_string(path)?;
        let snapshot: BackupSnapshot = serde_json::from_str(&data)?;

        let mut report = ImportReport::default();

        for element in snapshot.records() {
            match self.import_one(credential, element).await {
                Ok(record) => {
                    self.sink.notify(NotificationEvent::RecordImported {
                        name: record.name.clone(),
                    });
                    report.imported.push(record);
                }
                Err(e) => {
                    warn!(name = %element.name, error = %e, "import element failed");
                    self.sink.notify(NotificationEvent::RecordImportFailed {
                        name: element.name.clone(),
                        message: e.to_string(),
                    });
                    report.failed.push(FailedImport {
                        name: element.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            imported = report.imported.len(),
            failed = report.failed.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Writes one record's raw content to `path`.
    pub async fn download_config(
        &self,
        credential: &str,
        id: i64,
        path: &Path,
    ) -> Result<ConfigRecord, TransferError> {
        let record = self
            .gateway
            .get_config(credential, id)
            .await
            .map_err(TransferError::Fetch)?;

        std::fs::write(path, &record.content)?;
        info!(id, path = %path.display(), "downloaded config content");
        Ok(record)
    }

    /// Create-then-patch for one element. A record created but left
    /// unpatched stays on the server; the element is still reported as
    /// failed.
    async fn import_one(
        &self,
        credential: &str,
        element: &ConfigRecord,
    ) -> Result<ConfigRecord, GatewayError> {
        let created = self.gateway.create_config(credential, &element.name).await?;
        self.gateway
            .patch_config(
                credential,
                created.id,
                &element.content,
                element.version_tag(),
            )
            .await
    }
}
