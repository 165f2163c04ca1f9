pub mod cli;
pub mod clients;
pub mod config;
pub mod domain;
pub mod models;
pub mod services;
pub mod session;

pub use config::Config;

use clap::Parser;
use cli::{AccountCommands, Cli, Commands};
use cli::commands;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }

        Commands::Account { command } => match command {
            AccountCommands::Show => commands::cmd_account_show(&config).await,
            AccountCommands::Create { username } => {
                commands::cmd_account_create(&config, &username).await
            }
            AccountCommands::Delete => commands::cmd_account_delete(&config).await,
        },

        Commands::List => commands::cmd_list(&config).await,

        Commands::Show { id } => commands::cmd_show(&config, id).await,

        Commands::Create { name } => commands::cmd_create(&config, name.as_deref()).await,

        Commands::Download { id, output } => {
            commands::cmd_download(&config, id, output.as_deref()).await
        }

        Commands::Delete { id, yes } => commands::cmd_delete(&config, id, yes).await,

        Commands::Export { output } => commands::cmd_export(&config, output.as_deref()).await,

        Commands::Import { path } => commands::cmd_import(&config, &path).await,

        Commands::Rotate { confirm } => commands::cmd_rotate(&config, confirm).await,
    }
}
