use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Categories of session errors for consistent handling at the shell boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionErrorKind {
    /// Reading, writing or moving the backing file failed
    Io,
    /// The print spooler or print verb failed
    Print,
    /// Undo/redo with nothing to step through (informational)
    EmptyHistory,
    /// Edit offset or range outside the buffer or off a char boundary
    InvalidEdit,
}

impl SessionErrorKind {
    /// Informational kinds are shown as notices rather than errors.
    pub fn is_informational(self) -> bool {
        matches!(self, SessionErrorKind::EmptyHistory)
    }
}

impl fmt::Display for SessionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionErrorKind::Io => write!(f, "io"),
            SessionErrorKind::Print => write!(f, "print"),
            SessionErrorKind::EmptyHistory => write!(f, "empty_history"),
            SessionErrorKind::InvalidEdit => write!(f, "invalid_edit"),
        }
    }
}

/// Structured error from a session operation with kind and details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionError {
    /// Error category
    pub kind: SessionErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., the OS error or spooler stderr)
    pub details: Option<String>,
}

impl SessionError {
    /// Creates a new session error.
    pub fn new(kind: SessionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Creates an I/O error for a filesystem action on `path`.
    ///
    /// `action` reads as a verb phrase, e.g. "open file" or "save file".
    pub fn io(action: &str, path: &Path, err: &io::Error) -> Self {
        Self {
            kind: SessionErrorKind::Io,
            message: format!("Failed to {action} {}: {err}", path.display()),
            details: Some(format!("{:?}", err.kind())),
        }
    }

    /// Creates a print error.
    pub fn print(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Print, message)
    }

    pub fn nothing_to_undo() -> Self {
        Self::new(SessionErrorKind::EmptyHistory, "Nothing to undo")
    }

    pub fn nothing_to_redo() -> Self {
        Self::new(SessionErrorKind::EmptyHistory, "Nothing to redo")
    }

    pub fn invalid_edit(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::InvalidEdit, message)
    }

    pub fn is_informational(&self) -> bool {
        self.kind.is_informational()
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SessionError {}

/// Result type for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
