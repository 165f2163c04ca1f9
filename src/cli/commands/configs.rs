//! Config record command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::services::TransferService;

use super::{ConsoleSink, build_gateway, establish_session, read_line};

pub async fn cmd_list(config: &Config) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;

    let configs = gateway.list_configs(session.credential()).await?;

    if configs.is_empty() {
        println!("No config records stored.");
        println!();
        println!("Create one with: synctl create <name>");
        return Ok(());
    }

    println!("Config records ({} total)", configs.len());
    println!("{:-<70}", "");

    for record in &configs {
        let version = record
            .last_used_with_version
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or("-");

        println!("• {} (ID: {})", record.name, record.id);
        println!(
            "  Version: {} | Modified: {}",
            version, record.modified_at
        );
    }

    Ok(())
}

pub async fn cmd_show(config: &Config, id: i64) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;

    let record = gateway.get_config(session.credential(), id).await?;

    println!("Config record");
    println!("{:-<70}", "");
    println!("ID:       {}", record.id);
    println!("Name:     {}", record.name);
    println!(
        "Version:  {}",
        record.last_used_with_version.as_deref().unwrap_or("-")
    );
    println!("Created:  {}", record.created_at);
    println!("Modified: {}", record.modified_at);
    println!();
    println!("{}", record.content);

    Ok(())
}

pub async fn cmd_create(config: &Config, name: Option<&str>) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;

    // The server names unnamed records itself ("Unnamed config (date)").
    let record = gateway
        .create_config(session.credential(), name.unwrap_or(""))
        .await?;

    println!("✓ Created: {} (ID: {})", record.name, record.id);

    Ok(())
}

pub async fn cmd_download(
    config: &Config,
    id: i64,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;
    let transfer = TransferService::new(Arc::clone(&gateway), Arc::new(ConsoleSink));

    let path = output.map_or_else(|| PathBuf::from("config.yaml"), Path::to_path_buf);
    let record = transfer
        .download_config(session.credential(), id, &path)
        .await?;

    println!("✓ Wrote content of '{}' to {}", record.name, path.display());

    Ok(())
}

pub async fn cmd_delete(config: &Config, id: i64, yes: bool) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;

    let record = gateway.get_config(session.credential(), id).await?;

    if !yes {
        println!("Delete '{}' (ID: {})?", record.name, record.id);
        println!("Enter 'y' to confirm, anything else to cancel:");

        if !read_line()?.eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    gateway.delete_config(session.credential(), id).await?;
    println!("✓ Deleted: {}", record.name);

    Ok(())
}
