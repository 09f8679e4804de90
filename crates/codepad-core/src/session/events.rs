//! Session event types rendered by the shell.
//!
//! Every successful session operation reports what happened as a `SessionEvent`.
//! Events are serializable so the shell can emit them as JSON lines.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Events emitted by the document session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Session was reset to an empty, untitled document.
    Created,

    /// A file was loaded into the buffer.
    Opened { path: PathBuf, bytes: usize },

    /// The buffer was written to disk.
    Saved { path: PathBuf, bytes: usize },

    /// Save of an untitled document was cancelled at the destination prompt.
    SaveCancelled,

    /// The backing file was moved to the trash location.
    Disposed { from: PathBuf, to: PathBuf },

    /// The active platform has no trash support.
    DisposeUnavailable { platform: String },

    /// Dispose was requested for a document that was never saved.
    NothingToDispose,

    /// The document was handed to the print subsystem.
    Printed { platform: String },

    /// Print needs a saved file on this platform and there is none.
    PrintSkipped,

    /// Buffer content changed through an edit.
    Edited,

    Undone,

    Redone,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Created => write!(f, "New document"),
            SessionEvent::Opened { path, bytes } => {
                write!(f, "Opened {} ({bytes} bytes)", path.display())
            }
            SessionEvent::Saved { path, bytes } => {
                write!(f, "Saved {} ({bytes} bytes)", path.display())
            }
            SessionEvent::SaveCancelled => write!(f, "Save cancelled"),
            SessionEvent::Disposed { from, to } => {
                write!(f, "Moved {} to {}", from.display(), to.display())
            }
            SessionEvent::DisposeUnavailable { platform } => {
                write!(f, "Moving files to the trash is not available on {platform}")
            }
            SessionEvent::NothingToDispose => write!(f, "Nothing to dispose: document was never saved"),
            SessionEvent::Printed { platform } => write!(f, "Sent to printer ({platform})"),
            SessionEvent::PrintSkipped => write!(f, "Nothing to print: save the document first"),
            SessionEvent::Edited => write!(f, "Edited"),
            SessionEvent::Undone => write!(f, "Undone"),
            SessionEvent::Redone => write!(f, "Redone"),
        }
    }
}
