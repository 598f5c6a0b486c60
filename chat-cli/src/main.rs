//! # revalue-chat
//!
//! Command-line front-end for Re:Value marketplace chat.
//!
//! ## Commands
//!
//! - `items`: List marketplace items and their description sections
//! - `list`: Print a listing's conversation once
//! - `send`: Send a message to a listing's conversation
//! - `watch`: Follow a conversation, polling until Ctrl-C
//! - `ask`: Ask the resident craftsman a repair question
//! - `sections`: Split a listing description into display sections
//! - `status`: Show the effective configuration
//!
//! ## Example
//!
//! ```bash
//! # Browse listings
//! revalue-chat items
//!
//! # Show the conversation for a listing
//! revalue-chat list --item item-42
//!
//! # Say something
//! revalue-chat send --item item-42 "Is this still available?"
//!
//! # Follow replies every 3 seconds
//! revalue-chat watch --item item-42
//!
//! # Talk to the craftsman
//! revalue-chat ask "How do I fix a loose sole?"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{ask, items, list, sections, send, status, watch};
use config::ChatConfig;

/// Command-line front-end for Re:Value marketplace chat.
#[derive(Parser, Debug)]
#[command(name = "revalue-chat")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (default: chat.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL from the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List marketplace items and their description sections
    Items,

    /// Print a listing's conversation once
    List {
        /// Listing (item) id
        #[arg(long, short)]
        item: String,
    },

    /// Send a message to a listing's conversation
    Send {
        /// Listing (item) id
        #[arg(long, short)]
        item: String,

        /// Sender id (default: session user or chat.sender_id)
        #[arg(long, short)]
        sender: Option<String>,

        /// Message text
        text: String,
    },

    /// Follow a conversation until Ctrl-C
    Watch {
        /// Listing (item) id
        #[arg(long, short)]
        item: String,

        /// Poll interval in milliseconds (default: chat.poll_interval_ms)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Ask the resident craftsman a question
    Ask {
        /// Question text
        question: String,
    },

    /// Split a listing description into display sections
    Sections {
        /// Description text
        description: String,

        /// Fragment delimiter (default: newline)
        #[arg(long, short)]
        delimiter: Option<char>,
    },

    /// Show the effective configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    // An explicit --config must exist; the default location is optional
    let (mut config, config_path) = match cli.config {
        Some(path) => (ChatConfig::from_file(&path)?, path),
        None => {
            let path = default_config_path()?;
            let config = ChatConfig::from_file_or_default(&path)
                .context("Failed to load configuration")?;
            (config, path)
        }
    };
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }

    match cli.command {
        Commands::Items => {
            items::run(&config).await?;
        }
        Commands::List { item } => {
            list::run(&config, &item).await?;
        }
        Commands::Send { item, sender, text } => {
            send::run(&config, &item, sender.as_deref(), &text).await?;
        }
        Commands::Watch { item, interval_ms } => {
            watch::run(&config, &item, interval_ms).await?;
        }
        Commands::Ask { question } => {
            ask::run(&config, &question).await?;
        }
        Commands::Sections {
            description,
            delimiter,
        } => {
            sections::run(&description, delimiter);
        }
        Commands::Status => {
            status::run(&config, &config_path);
        }
    }

    Ok(())
}

/// Install the stderr log subscriber (`RUST_LOG` overrides the default).
fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

/// Get the default config file path for revalue-chat.
fn default_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("market", "revalue", "revalue-chat")
        .context("Could not determine home directory")?;
    Ok(dirs.config_dir().join("chat.toml"))
}
