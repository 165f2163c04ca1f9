//! Re-homing of a single config record under a new credential.

use std::sync::Arc;

use tracing::debug;

use crate::clients::{Gateway, GatewayError};
use crate::models::ConfigRecord;

/// Applies one record's content under a (typically fresh) credential.
///
/// The patch carries the record's content and version tag unchanged, so
/// repeating it for the same `(credential, record)` pair overwrites the
/// remote record with identical data. Callers may retry a step safely;
/// the rotation orchestrator deliberately does not.
pub struct ConfigMigrator {
    gateway: Arc<dyn Gateway>,
}

impl ConfigMigrator {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn migrate(
        &self,
        credential: &str,
        record: &ConfigRecord,
    ) -> Result<ConfigRecord, GatewayError> {
        debug!(id = record.id, name = %record.name, "migrating record");
        self.gateway
            .patch_config(credential, record.id, &record.content, record.version_tag())
            .await
    }
}
