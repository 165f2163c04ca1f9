//! Pre-rotation snapshot of the account's config records.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::clients::{Gateway, GatewayError};
use crate::models::BackupSnapshot;

/// Failure while capturing or persisting a snapshot.
///
/// Any of these aborts a rotation before the credential is touched.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("config list could not be fetched: {0}")]
    Unreadable(#[source] GatewayError),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write snapshot artifact: {0}")]
    Write(#[from] std::io::Error),
}

/// Captures the full config list into a portable artifact.
pub struct BackupExporter {
    gateway: Arc<dyn Gateway>,
}

impl BackupExporter {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Fetches every record reachable under `credential`, in listing
    /// order. An empty account yields an empty (still valid) snapshot.
    pub async fn snapshot(&self, credential: &str) -> Result<BackupSnapshot, BackupError> {
        let records = self
            .gateway
            .list_configs(credential)
            .await
            .map_err(BackupError::Unreadable)?;

        info!(records = records.len(), "captured backup snapshot");
        Ok(BackupSnapshot::new(records))
    }

    /// Writes the snapshot as a timestamped JSON file under `dir` and
    /// returns the artifact path.
    pub fn write(&self, snapshot: &BackupSnapshot, dir: &Path) -> Result<PathBuf, BackupError> {
        std::fs::create_dir_all(dir)?;

        let filename = format!(
            "sync-configs-backup-{}.json",
            Utc::now().format("%Y%m%dT%H%M%SZ")
        );
        let path = dir.join(filename);

        let data = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&path, data)?;

        info!(path = %path.display(), "wrote backup artifact");
        Ok(path)
    }
}
