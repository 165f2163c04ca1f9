//! Export and import command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::services::TransferService;

use super::{ConsoleSink, build_gateway, establish_session};

pub async fn cmd_export(config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;
    let transfer = TransferService::new(Arc::clone(&gateway), Arc::new(ConsoleSink));

    let path = output.map_or_else(|| PathBuf::from("sync-configs.json"), Path::to_path_buf);
    let snapshot = transfer.export_to_file(session.credential(), &path).await?;

    println!(
        "✓ Exported {} records to {}",
        snapshot.len(),
        path.display()
    );

    Ok(())
}

pub async fn cmd_import(config: &Config, path: &Path) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;
    let transfer = TransferService::new(Arc::clone(&gateway), Arc::new(ConsoleSink));

    println!("Importing from {}", path.display());

    let report = transfer.import_from_file(session.credential(), path).await?;

    println!();
    println!("{:-<70}", "");
    println!("Import complete!");
    println!("  Imported: {}", report.imported.len());
    if !report.failed.is_empty() {
        println!("  Failed:   {}", report.failed.len());
    }

    Ok(())
}
