//! Platform capabilities: moving files to the trash and printing.
//!
//! The session never branches on the OS itself. The shell picks one
//! [`PlatformActions`] implementation at startup via [`detect`] and passes it
//! to `dispose`/`print`.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::config::{Config, PrintConfig, TrashConfig};
use crate::session::{SessionError, SessionResult};

mod unix;
mod windows;

pub use unix::UnixDesktop;
pub use windows::WindowsDesktop;

/// Which platform variant to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Pick from the compile target (default)
    #[default]
    Auto,
    /// Spooler printing, no trash
    Unix,
    /// Recycle directory and the print verb
    Windows,
}

impl PlatformKind {
    /// Resolves `Auto` to the variant matching the compile target.
    pub fn resolve(self) -> PlatformKind {
        match self {
            PlatformKind::Auto if cfg!(windows) => PlatformKind::Windows,
            PlatformKind::Auto => PlatformKind::Unix,
            other => other,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PlatformKind::Auto => "auto",
            PlatformKind::Unix => "unix",
            PlatformKind::Windows => "windows",
        }
    }
}

/// What the print subsystem gets to see of the document.
#[derive(Debug, Clone, Copy)]
pub struct PrintJob<'a> {
    /// Current in-memory buffer
    pub content: &'a str,
    /// Backing file, if the document was ever saved
    pub path: Option<&'a Path>,
}

/// Result of a print request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    Submitted,
    /// The platform needs a saved file and the document has none.
    Skipped,
}

/// OS-specific destructive and printing actions.
pub trait PlatformActions {
    /// Short platform label used in events and logs.
    fn name(&self) -> &'static str;

    fn supports_trash(&self) -> bool;

    /// Moves `path` to the trash location and returns where it ended up.
    ///
    /// # Errors
    /// Returns an `Io` error if the trash location cannot be created, the move
    /// fails, or the platform has no trash support.
    fn trash(&self, path: &Path) -> SessionResult<PathBuf>;

    /// Hands the document to the OS print subsystem.
    ///
    /// # Errors
    /// Returns a `Print` error if the print command cannot be started or exits
    /// unsuccessfully.
    fn print(&self, job: PrintJob<'_>) -> SessionResult<PrintOutcome>;
}

/// Selects the platform implementation for this run.
pub fn detect(config: &Config) -> Box<dyn PlatformActions> {
    let kind = config.platform.resolve();
    tracing::debug!(platform = kind.display_name(), "selected platform actions");
    match kind {
        PlatformKind::Windows => Box::new(WindowsDesktop::from_config(&config.trash, &config.print)),
        PlatformKind::Unix | PlatformKind::Auto => Box::new(UnixDesktop::from_config(&config.print)),
    }
}

/// Runs a print command to completion, mapping failures to `Print` errors.
fn run_print_command(mut command: Command) -> SessionResult<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .map_err(|err| SessionError::print(format!("Failed to run {program}: {err}")))?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let status = output
        .status
        .code()
        .map_or_else(|| "signal".to_string(), |code| code.to_string());
    let err = SessionError::print(format!("{program} exited with status {status}"));
    let stderr = stderr.trim();
    if stderr.is_empty() {
        Err(err)
    } else {
        Err(err.with_details(stderr))
    }
}

impl TrashConfig {
    /// Trash directory: configured value, else `~/AppData/Local/Recycle Bin`.
    pub fn effective_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = self.dir.as_deref().map(str::trim)
            && !dir.is_empty()
        {
            return Some(PathBuf::from(dir));
        }
        dirs::home_dir().map(|home| home.join("AppData").join("Local").join("Recycle Bin"))
    }
}

impl PrintConfig {
    pub fn temp_path(&self) -> PathBuf {
        PathBuf::from(&self.temp_file)
    }
}
