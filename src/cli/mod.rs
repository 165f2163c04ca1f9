//! Command-line interface for synctl.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// synctl - operator console for a config-sync account
#[derive(Parser)]
#[command(name = "synctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage the account itself
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// List all config records
    #[command(alias = "ls", alias = "l")]
    List,

    /// Show one config record, including its content
    #[command(alias = "s")]
    Show {
        /// Config record ID
        id: i64,
    },

    /// Create a new (empty) config record
    Create {
        /// Record name; the server picks one when omitted
        name: Option<String>,
    },

    /// Write one record's raw content to a file
    Download {
        /// Config record ID
        id: i64,
        /// Output file (default: config.yaml)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Delete a config record
    #[command(alias = "rm")]
    Delete {
        /// Config record ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export all config records to a JSON file
    Export {
        /// Output file (default: sync-configs.json)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Recreate config records from an exported JSON file
    Import {
        /// Path to a previously exported JSON array
        path: PathBuf,
    },

    /// Rotate the account credential and re-home every record
    Rotate {
        /// Current credential, to confirm; prompted for when omitted
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Show the authenticated account
    Show,
    /// Create a new account and print its one-time credential
    Create {
        /// Username for the new account
        username: String,
    },
    /// Delete the account and every config record it owns
    Delete,
}
