//! Debug View CLI - Browse the databases of an app's debug server
//!
//! Usage:
//!   debugview                       Browse interactively
//!   debugview dbs                   List databases
//!   debugview tables <DB>           List tables of a database
//!   debugview show <DB> [TABLE]     Print a table
//!   debugview add <DB> <KEY> <VAL>  Add a key/value entry
//!   debugview web                   Open the browser viewer

mod client;
mod commands;
mod config;
mod tui;
mod viewer;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::edit::Mutation;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "debugview")]
#[command(author = "Debug View Team")]
#[command(version)]
#[command(about = "Browse the databases of an app's debug server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Debug server URL (overrides the config file)
    #[arg(short, long, global = true, env = "DEBUGVIEW_SERVER")]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse databases interactively (default)
    Browse,

    /// List databases
    Dbs,

    /// List the tables of a database
    Tables {
        /// Database name
        db: String,
    },

    /// Print the rows of a table
    Show {
        /// Database name
        db: String,

        /// Table name (defaults to the first table)
        table: Option<String>,

        /// Only print rows containing this text (case-insensitive)
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Print an HTML table fragment instead of text
        #[arg(long)]
        html: bool,
    },

    /// Add a key/value entry
    Add {
        db: String,
        key: String,
        value: String,
    },

    /// Overwrite a key/value entry
    Update {
        db: String,
        key: String,
        value: String,
    },

    /// Delete a key/value entry
    Delete {
        db: String,
        key: String,
    },

    /// Open the browser viewer
    Web,

    /// Show or update the saved configuration
    Config {
        /// Save a new default server URL
        #[arg(long)]
        set_server: Option<String>,

        /// Save a new request timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);

    // The TUI owns the terminal, so its logs go to a file
    init_logging(cli.verbose, matches!(command, Commands::Browse))?;

    let saved = config::Config::load()?;
    let config = saved.clone().with_server(cli.server);

    match command {
        Commands::Browse => {
            commands::browse::run(&config).await?;
        }

        Commands::Dbs => {
            commands::inspect::databases(&config).await?;
        }

        Commands::Tables { db } => {
            commands::inspect::tables(&config, &db).await?;
        }

        Commands::Show {
            db,
            table,
            search,
            html,
        } => {
            let opts = commands::inspect::ShowOptions {
                db,
                table,
                search,
                html,
            };
            commands::inspect::show(&config, opts).await?;
        }

        Commands::Add { db, key, value } => {
            commands::edit::run(&config, Mutation::Add, &db, &key, Some(&value)).await?;
        }

        Commands::Update { db, key, value } => {
            commands::edit::run(&config, Mutation::Update, &db, &key, Some(&value)).await?;
        }

        Commands::Delete { db, key } => {
            commands::edit::run(&config, Mutation::Delete, &db, &key, None).await?;
        }

        Commands::Web => {
            commands::config::web(&config).await?;
        }

        Commands::Config {
            set_server,
            set_timeout,
        } => {
            commands::config::run(saved, set_server, set_timeout).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, to_file: bool) -> Result<()> {
    let log_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{},debugview_cli={}", log_level, log_level).into());

    if to_file {
        config::ensure_dirs()?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(config::log_file())
            .context("Failed to open log file")?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }

    Ok(())
}
