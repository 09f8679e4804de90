//! Logging setup.
//!
//! Installs a `tracing` subscriber that writes to stderr, or to the configured
//! log file. Stdout belongs to the shell and is never used for logs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Builds the filter: `RUST_LOG` wins, then the configured level.
fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(config.level.trim())
        .with_context(|| format!("Invalid log level '{}'", config.level))
}

/// Initializes the global subscriber.
///
/// Returns the file writer guard when logging to a file; keep it alive until
/// exit so buffered lines are flushed.
///
/// # Errors
/// Returns an error if the level is invalid or the log directory cannot be created.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(config)?;

    let Some(file) = config.file.as_deref().map(str::trim).filter(|f| !f.is_empty()) else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|err| anyhow::anyhow!("Failed to install logger: {err}"))?;
        return Ok(None);
    };

    let path = Path::new(file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {file}"))?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install logger: {err}"))?;

    Ok(Some(guard))
}
