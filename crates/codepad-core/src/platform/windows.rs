//! Windows desktop: per-user recycle directory and the shell "print" verb.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{PlatformActions, PrintJob, PrintOutcome, run_print_command};
use crate::config::{PrintConfig, TrashConfig};
use crate::session::{SessionError, SessionErrorKind, SessionResult};

#[derive(Debug, Clone)]
pub struct WindowsDesktop {
    trash_dir: Option<PathBuf>,
    shell: String,
}

impl WindowsDesktop {
    pub fn new(trash_dir: Option<PathBuf>, shell: impl Into<String>) -> Self {
        Self {
            trash_dir,
            shell: shell.into(),
        }
    }

    pub fn from_config(trash: &TrashConfig, print: &PrintConfig) -> Self {
        Self::new(trash.effective_dir(), print.shell.clone())
    }

    fn print_verb_command(&self, path: &Path) -> Command {
        let script = format!(
            "Start-Process -FilePath {} -Verb Print",
            powershell_quote(&path.to_string_lossy())
        );
        let mut command = Command::new(&self.shell);
        command.args(["-NoProfile", "-NonInteractive", "-Command", &script]);
        command
    }
}

impl PlatformActions for WindowsDesktop {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn supports_trash(&self) -> bool {
        true
    }

    fn trash(&self, path: &Path) -> SessionResult<PathBuf> {
        let Some(dir) = self.trash_dir.as_deref() else {
            return Err(SessionError::new(
                SessionErrorKind::Io,
                "Failed to locate recycle bin: home directory is unknown",
            ));
        };

        fs::create_dir_all(dir).map_err(|err| SessionError::io("create recycle bin", dir, &err))?;

        let file_name = path.file_name().ok_or_else(|| {
            SessionError::new(
                SessionErrorKind::Io,
                format!("Failed to move {} to recycle bin: not a file", path.display()),
            )
        })?;
        let target = unique_target(dir, Path::new(file_name));

        move_file(path, &target)
            .map_err(|err| SessionError::io("move to recycle bin", path, &err))?;
        tracing::debug!(from = %path.display(), to = %target.display(), "moved file to recycle bin");
        Ok(target)
    }

    /// Prints the saved file, not the buffer; unsaved documents are skipped.
    fn print(&self, job: PrintJob<'_>) -> SessionResult<PrintOutcome> {
        let Some(path) = job.path else {
            return Ok(PrintOutcome::Skipped);
        };
        run_print_command(self.print_verb_command(path))?;
        Ok(PrintOutcome::Submitted)
    }
}

/// Picks `dir/name`, or `dir/stem (n).ext` if that is taken.
fn unique_target(dir: &Path, name: &Path) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| {
            let file = match &ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            dir.join(file)
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Rename, falling back to copy + remove across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(err) => Err(err),
    }
}

/// Single-quotes a string for PowerShell (`'` doubles inside the literal).
fn powershell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
