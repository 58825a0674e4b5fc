//! arsip CLI
//!
//! Command-line and terminal interface for managing archive records.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use arsip_core::{ArchiveId, ArchiveStore, Config, HttpArchiveClient};

mod commands;
mod editor;
mod logging;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "arsip")]
#[command(about = "arsip - archive record management client")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List arsip records
    #[command(alias = "ls")]
    List {
        /// Filter by name or description (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Rows per page (defaults to config page_size)
        #[arg(long)]
        per_page: Option<usize>,
        /// Show every matching record on one page
        #[arg(short, long, conflicts_with_all = ["page", "per_page"])]
        all: bool,
    },
    /// Show a single record
    Show {
        /// Record ID
        id: ArchiveId,
    },
    /// Create a new record
    #[command(alias = "add")]
    Create {
        /// Record name
        #[arg(short, long)]
        nama: String,
        /// Record date (YYYY-MM-DD)
        #[arg(short, long)]
        tanggal: NaiveDate,
        /// Description
        #[arg(short, long, default_value = "")]
        deskripsi: String,
    },
    /// Edit a record (prompts for each field when no flag is given)
    Edit {
        /// Record ID
        id: ArchiveId,
        /// New name
        #[arg(short, long)]
        nama: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        tanggal: Option<NaiveDate>,
        /// New description
        #[arg(short, long)]
        deskripsi: Option<String>,
    },
    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record ID
        id: ArchiveId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, page_size, data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need a backend
    let command = match cli.command {
        Some(Commands::Config { command }) => {
            return handle_config_command(command, cli.config.as_ref(), &output);
        }
        other => other,
    };

    let mut config =
        Config::load_with_cli_override(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    // TUI is the default when no command is given
    let command = match command {
        None | Some(Commands::Tui) => return tui::run(config).await,
        Some(command) => command,
    };

    logging::init_stderr();

    let client = HttpArchiveClient::from_config(&config)
        .with_context(|| format!("Invalid base_url: {}", config.base_url))?;
    let store = ArchiveStore::new(client);

    match command {
        Commands::List {
            search,
            page,
            per_page,
            all,
        } => {
            let per_page = if all {
                usize::MAX
            } else {
                per_page.unwrap_or(config.page_size)
            };
            commands::arsip::list(&store, search, page, per_page, &output).await
        }
        Commands::Show { id } => commands::arsip::show(&store, id, &output).await,
        Commands::Create {
            nama,
            tanggal,
            deskripsi,
        } => commands::arsip::create(&store, nama, deskripsi, tanggal, &output).await,
        Commands::Edit {
            id,
            nama,
            tanggal,
            deskripsi,
        } => {
            let changes = commands::arsip::FieldChanges {
                nama,
                deskripsi,
                tanggal,
            };
            commands::arsip::edit(&store, id, changes, &output).await
        }
        Commands::Delete { id, yes } => commands::arsip::delete(&store, id, yes, &output).await,
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
