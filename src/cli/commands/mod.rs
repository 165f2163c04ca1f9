//! Command handlers.

mod account;
mod configs;
mod rotate;
mod transfer;

pub use account::{cmd_account_create, cmd_account_delete, cmd_account_show};
pub use configs::{cmd_create, cmd_delete, cmd_download, cmd_list, cmd_show};
pub use rotate::cmd_rotate;
pub use transfer::{cmd_export, cmd_import};

use std::sync::Arc;

use crate::clients::{Gateway, HttpGateway};
use crate::config::{CREDENTIAL_ENV, Config};
use crate::domain::{NotificationEvent, NotificationSink};
use crate::session::SessionContext;

/// Sink that prints workflow notifications the way the rest of the CLI
/// prints its output.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, event: NotificationEvent) {
        match event {
            NotificationEvent::BackupCompleted { records, path } => {
                println!("✓ Backed up {records} records to {path}");
            }
            NotificationEvent::CredentialReissued => {
                println!("✓ New credential issued (old one is now invalid)");
            }
            NotificationEvent::RecordMigrated { id, name } => {
                println!("  ✓ Migrated: {name} (ID: {id})");
            }
            NotificationEvent::RecordMigrationFailed { id, name, message } => {
                println!("  ✗ Failed:   {name} (ID: {id}) - {message}");
            }
            NotificationEvent::RotationCompleted { migrated } => {
                println!("✓ Rotation complete: {migrated} records migrated");
            }
            NotificationEvent::RotationHalted {
                failed_name,
                stranded,
                ..
            } => {
                println!("⚠ Rotation halted at '{failed_name}'; {stranded} records not attempted");
            }
            NotificationEvent::RecordImported { name } => {
                println!("  ✓ Imported: {name}");
            }
            NotificationEvent::RecordImportFailed { name, message } => {
                println!("  ✗ Failed:   {name} - {message}");
            }
            NotificationEvent::Info { message } => println!("{message}"),
            NotificationEvent::Error { message } => println!("⚠ {message}"),
        }
    }
}

pub fn build_gateway(config: &Config) -> anyhow::Result<Arc<dyn Gateway>> {
    let gateway = HttpGateway::new(
        &config.server.base_url,
        config.server.request_timeout_seconds,
    )?;
    Ok(Arc::new(gateway))
}

/// Resolves the credential and authenticates it against the remote.
pub async fn establish_session(
    config: &Config,
    gateway: &dyn Gateway,
) -> anyhow::Result<SessionContext> {
    let credential = config.resolve_credential().ok_or_else(|| {
        anyhow::anyhow!(
            "No credential configured. Set {CREDENTIAL_ENV} or auth.credential in config.toml"
        )
    })?;

    let session = SessionContext::establish(gateway, credential).await?;
    Ok(session)
}

/// Reads one trimmed line from stdin.
pub(crate) fn read_line() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
