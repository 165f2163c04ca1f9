//! Credential rotation command handler.

use std::sync::Arc;

use crate::config::Config;
use crate::services::rotation::{
    MigrationOutcome, RotationError, RotationOrchestrator, RotationStatus,
};

use super::{ConsoleSink, build_gateway, establish_session, read_line};

pub async fn cmd_rotate(config: &Config, confirm: Option<String>) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;

    println!("Credential rotation for account '{}'", session.account().username);
    println!("{:-<70}", "");
    println!("This issues a new credential and invalidates the current one");
    println!("immediately. Every config record is then re-attached under the");
    println!("new credential. A backup is written first; if a step fails after");
    println!("the reissue, the remaining records can only be restored manually");
    println!("from that backup.");
    println!();

    let confirmation = match confirm {
        Some(value) => value,
        None => {
            println!("Enter the current credential to confirm:");
            read_line()?
        }
    };

    let orchestrator = RotationOrchestrator::new(
        Arc::clone(&gateway),
        Arc::new(ConsoleSink),
        config.backup.export_dir.clone(),
    );

    let report = match orchestrator.rotate(&session, &confirmation).await {
        Ok(report) => report,
        Err(e @ RotationError::CredentialMismatch) => {
            println!("✗ {e}");
            println!("Nothing was changed. Check the credential and try again.");
            return Ok(());
        }
        Err(e) => {
            println!("✗ Rotation aborted before the credential was touched: {e}");
            println!("The current credential is still valid; the flow is safe to retry.");
            return Ok(());
        }
    };

    println!();
    println!("{:-<70}", "");
    for record in &report.records {
        match &record.outcome {
            MigrationOutcome::Migrated => {
                println!("  ✓ {} (ID: {})", record.name, record.id);
            }
            MigrationOutcome::Failed(message) => {
                println!("  ✗ {} (ID: {}) - {}", record.name, record.id, message);
            }
            MigrationOutcome::NotAttempted => {
                println!("  ○ {} (ID: {}) - not attempted", record.name, record.id);
            }
        }
    }

    println!();
    match report.status {
        RotationStatus::Completed => {
            println!("✓ Rotation complete. {} records migrated.", report.migrated_count());
        }
        RotationStatus::Halted { .. } => {
            println!("⚠ Rotation halted after the credential was replaced.");
            println!("  Records marked ○ or ✗ are no longer reachable through the");
            println!("  service. Re-import them from the backup once the cause is");
            println!("  fixed: synctl import {}", report.backup_path.display());
        }
    }

    println!();
    println!("New credential: {}", report.new_credential);
    println!();
    println!("Store it now and update your clients; it is not shown again.");

    Ok(())
}
