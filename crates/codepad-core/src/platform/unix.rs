//! Unix desktop: prints through a line-printer spooler, has no trash.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{PlatformActions, PrintJob, PrintOutcome, run_print_command};
use crate::config::PrintConfig;
use crate::session::{SessionError, SessionErrorKind, SessionResult};

/// Spooler-based printing against a fixed temporary file.
#[derive(Debug, Clone)]
pub struct UnixDesktop {
    command: String,
    args: Vec<String>,
    temp_file: PathBuf,
}

impl UnixDesktop {
    pub fn new(command: impl Into<String>, args: Vec<String>, temp_file: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args,
            temp_file: temp_file.into(),
        }
    }

    pub fn from_config(print: &PrintConfig) -> Self {
        Self::new(print.command.clone(), print.args.clone(), print.temp_path())
    }

    pub fn temp_file(&self) -> &Path {
        &self.temp_file
    }
}

impl PlatformActions for UnixDesktop {
    fn name(&self) -> &'static str {
        "unix"
    }

    fn supports_trash(&self) -> bool {
        false
    }

    fn trash(&self, path: &Path) -> SessionResult<PathBuf> {
        Err(SessionError::new(
            SessionErrorKind::Io,
            format!("Cannot move {} to trash: not supported on unix", path.display()),
        ))
    }

    /// Always prints the in-memory buffer, saved or not.
    fn print(&self, job: PrintJob<'_>) -> SessionResult<PrintOutcome> {
        fs::write(&self.temp_file, job.content).map_err(|err| {
            SessionError::print(format!(
                "Failed to write print file {}: {err}",
                self.temp_file.display()
            ))
        })?;

        let mut command = Command::new(&self.command);
        command.args(&self.args).arg(&self.temp_file);
        tracing::debug!(command = %self.command, file = %self.temp_file.display(), "spooling print job");
        run_print_command(command)?;
        Ok(PrintOutcome::Submitted)
    }
}
