//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use codepad_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "codepad")]
#[command(version)]
#[command(about = "Terminal document editor shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Edit a document interactively (commands are read from stdin)
    Edit {
        /// File to open at startup
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print session events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print a file through the platform print subsystem
    Print {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Move a file to the platform trash
    Trash {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Shows the config file path
    Path,
    /// Creates a default config file
    Init,
    /// Prints the default config generated from built-in defaults
    Generate,
}

/// Parses arguments and runs the selected command.
///
/// # Errors
/// Returns an error if config loading, logging setup, or the command fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when the existing config is broken.
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        };
    }

    let config = config::Config::load().context("load config")?;
    let _log_guard = logging::init(&config.log).context("init logging")?;

    match cli.command {
        Some(Commands::Edit { path, json }) => commands::edit::run(&config, path.as_deref(), json),
        Some(Commands::Print { path }) => commands::print::run(&config, &path),
        Some(Commands::Trash { path }) => commands::trash::run(&config, &path),
        Some(Commands::Config { .. }) => Ok(()),
        None => commands::edit::run(&config, None, false),
    }
}
