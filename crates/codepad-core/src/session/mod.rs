//! Document session: the single open document of an editor window.
//!
//! The session owns the buffer, the backing path and the persistence state.
//! Shells call its operations in response to user actions and render the
//! returned [`SessionEvent`] or [`SessionError`]. Failed operations leave the
//! session exactly as it was before the call.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

mod error;
mod events;
mod history;

pub use error::{SessionError, SessionErrorKind, SessionResult};
pub use events::SessionEvent;
pub use history::EditHistory;

use crate::config::EditorConfig;
use crate::platform::{PlatformActions, PrintJob, PrintOutcome};

/// Application name shown in window titles.
pub const APP_NAME: &str = "CodePad";

/// Persistence state of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentState {
    /// Never saved and never edited
    #[default]
    Unsaved,
    /// Matches the file at `path`
    Clean,
    /// Edited since the last load or save (may or may not have a path)
    Modified,
}

#[derive(Debug, Clone)]
pub struct DocumentSession {
    path: Option<PathBuf>,
    content: String,
    state: DocumentState,
    history: EditHistory,
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl DocumentSession {
    /// Creates an empty, untitled session.
    pub fn new(editor: &EditorConfig) -> Self {
        Self {
            path: None,
            content: String::new(),
            state: DocumentState::Unsaved,
            history: EditHistory::with_limit(editor.undo_limit),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == DocumentState::Modified
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Window title, e.g. `*notes.txt - CodePad` for a modified document.
    pub fn title(&self) -> String {
        let name = self
            .path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "Untitled".to_string(), |n| n.to_string_lossy().into_owned());
        let marker = if self.is_dirty() { "*" } else { "" };
        format!("{marker}{name} - {APP_NAME}")
    }

    /// Resets to an empty, untitled document.
    ///
    /// Unsaved modifications are discarded without confirmation; shells that
    /// want a guard check [`DocumentSession::is_dirty`] first.
    pub fn new_document(&mut self) -> SessionEvent {
        self.reset();
        tracing::debug!("session reset to new document");
        SessionEvent::Created
    }

    /// Loads `path` into the buffer.
    ///
    /// # Errors
    /// Returns an `Io` error if the file cannot be read or is not valid UTF-8.
    pub fn open(&mut self, path: impl AsRef<Path>) -> SessionResult<SessionEvent> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|err| SessionError::io("open file", path, &err))
            .inspect_err(|err| tracing::warn!(error = %err, "open failed"))?;

        let bytes = content.len();
        self.content = content;
        self.path = Some(path.to_path_buf());
        self.state = DocumentState::Clean;
        self.history.clear();
        tracing::debug!(path = %path.display(), bytes, "opened document");

        Ok(SessionEvent::Opened {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// Saves to the current path, or asks `prompt` for one if there is none.
    ///
    /// A prompt returning `None` cancels the save without touching state.
    ///
    /// # Errors
    /// Returns an `Io` error if the write fails; the dirty state is kept.
    pub fn save<F>(&mut self, prompt: F) -> SessionResult<SessionEvent>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        match self.path.clone() {
            Some(path) => self.write_to(path),
            None => match prompt() {
                Some(path) => self.save_as(path),
                None => {
                    tracing::debug!("save cancelled at destination prompt");
                    Ok(SessionEvent::SaveCancelled)
                }
            },
        }
    }

    /// Writes the buffer to exactly `path` and makes it the document's path.
    ///
    /// # Errors
    /// Returns an `Io` error if the write fails; path and dirty state are kept.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> SessionResult<SessionEvent> {
        self.write_to(path.as_ref().to_path_buf())
    }

    /// Moves the backing file to the platform trash and resets the session.
    ///
    /// A never-saved document and a platform without trash are both reported
    /// as events rather than errors.
    ///
    /// # Errors
    /// Returns an `Io` error if the trash move fails; the session is unchanged.
    pub fn dispose(&mut self, actions: &dyn PlatformActions) -> SessionResult<SessionEvent> {
        let Some(path) = self.path.clone() else {
            return Ok(SessionEvent::NothingToDispose);
        };
        if !actions.supports_trash() {
            return Ok(SessionEvent::DisposeUnavailable {
                platform: actions.name().to_string(),
            });
        }

        let to = actions
            .trash(&path)
            .inspect_err(|err| tracing::warn!(error = %err, "dispose failed"))?;
        self.reset();

        Ok(SessionEvent::Disposed { from: path, to })
    }

    /// Sends the document to the platform print subsystem.
    ///
    /// # Errors
    /// Returns a `Print` error if the print command fails.
    pub fn print(&self, actions: &dyn PlatformActions) -> SessionResult<SessionEvent> {
        let job = PrintJob {
            content: &self.content,
            path: self.path.as_deref(),
        };
        let outcome = actions
            .print(job)
            .inspect_err(|err| tracing::warn!(error = %err, "print failed"))?;

        Ok(match outcome {
            PrintOutcome::Submitted => SessionEvent::Printed {
                platform: actions.name().to_string(),
            },
            PrintOutcome::Skipped => SessionEvent::PrintSkipped,
        })
    }

    /// # Errors
    /// Returns `EmptyHistory` when there is nothing to undo.
    pub fn undo(&mut self) -> SessionResult<SessionEvent> {
        let previous = self
            .history
            .undo(&self.content)
            .ok_or_else(SessionError::nothing_to_undo)?;
        self.content = previous;
        self.state = DocumentState::Modified;
        Ok(SessionEvent::Undone)
    }

    /// # Errors
    /// Returns `EmptyHistory` when there is nothing to redo.
    pub fn redo(&mut self) -> SessionResult<SessionEvent> {
        let next = self
            .history
            .redo(&self.content)
            .ok_or_else(SessionError::nothing_to_redo)?;
        self.content = next;
        self.state = DocumentState::Modified;
        Ok(SessionEvent::Redone)
    }

    /// Inserts `text` at byte `offset`.
    ///
    /// # Errors
    /// Returns `InvalidEdit` if `offset` is past the end or not on a char boundary.
    pub fn insert(&mut self, offset: usize, text: &str) -> SessionResult<SessionEvent> {
        if !self.content.is_char_boundary(offset) {
            return Err(SessionError::invalid_edit(format!(
                "Insert offset {offset} is outside the buffer or inside a character"
            )));
        }
        if text.is_empty() {
            return Ok(SessionEvent::Edited);
        }
        self.record_edit();
        self.content.insert_str(offset, text);
        Ok(SessionEvent::Edited)
    }

    /// Appends `text` at the end of the buffer.
    pub fn append(&mut self, text: &str) -> SessionEvent {
        if !text.is_empty() {
            self.record_edit();
            self.content.push_str(text);
        }
        SessionEvent::Edited
    }

    /// Removes the byte range `range`.
    ///
    /// # Errors
    /// Returns `InvalidEdit` if the range is reversed, out of bounds, or splits
    /// a character.
    pub fn delete(&mut self, range: Range<usize>) -> SessionResult<SessionEvent> {
        if range.start > range.end
            || !self.content.is_char_boundary(range.start)
            || !self.content.is_char_boundary(range.end)
        {
            return Err(SessionError::invalid_edit(format!(
                "Delete range {}..{} is not a valid range of the buffer",
                range.start, range.end
            )));
        }
        if range.is_empty() {
            return Ok(SessionEvent::Edited);
        }
        self.record_edit();
        self.content.replace_range(range, "");
        Ok(SessionEvent::Edited)
    }

    /// Replaces the whole buffer with `text`.
    pub fn replace_all(&mut self, text: impl Into<String>) -> SessionEvent {
        let text = text.into();
        if text != self.content {
            self.record_edit();
            self.content = text;
        }
        SessionEvent::Edited
    }

    fn record_edit(&mut self) {
        self.history.record(self.content.clone());
        self.state = DocumentState::Modified;
    }

    fn write_to(&mut self, path: PathBuf) -> SessionResult<SessionEvent> {
        fs::write(&path, &self.content)
            .map_err(|err| SessionError::io("save file", &path, &err))
            .inspect_err(|err| tracing::warn!(error = %err, "save failed"))?;

        let bytes = self.content.len();
        tracing::debug!(path = %path.display(), bytes, "saved document");
        self.path = Some(path.clone());
        self.state = DocumentState::Clean;

        Ok(SessionEvent::Saved { path, bytes })
    }

    fn reset(&mut self) {
        self.content.clear();
        self.path = None;
        self.state = DocumentState::Unsaved;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tempfile::tempdir;

    use super::*;
    use crate::platform::{UnixDesktop, WindowsDesktop};

    /// Records calls instead of touching the OS.
    #[derive(Default)]
    struct RecordingPlatform {
        trash_supported: bool,
        fail: bool,
        printed: RefCell<Vec<(String, Option<PathBuf>)>>,
    }

    impl PlatformActions for RecordingPlatform {
        fn name(&self) -> &'static str {
            "test"
        }

        fn supports_trash(&self) -> bool {
            self.trash_supported
        }

        fn trash(&self, path: &Path) -> SessionResult<PathBuf> {
            if self.fail {
                return Err(SessionError::new(SessionErrorKind::Io, "trash failed"));
            }
            Ok(PathBuf::from("/trash").join(path.file_name().unwrap()))
        }

        fn print(&self, job: PrintJob<'_>) -> SessionResult<PrintOutcome> {
            if self.fail {
                return Err(SessionError::print("spooler offline"));
            }
            self.printed
                .borrow_mut()
                .push((job.content.to_string(), job.path.map(Path::to_path_buf)));
            Ok(PrintOutcome::Submitted)
        }
    }

    fn session() -> DocumentSession {
        DocumentSession::default()
    }

    #[test]
    fn save_as_then_open_round_trips_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let text = "first line\nsecond line\nünïcödé ✓\n";

        let mut writer = session();
        writer.append(text);
        writer.save_as(&path).unwrap();

        let mut reader = session();
        let event = reader.open(&path).unwrap();

        assert_eq!(reader.content(), text);
        assert_eq!(
            event,
            SessionEvent::Opened {
                path: path.clone(),
                bytes: text.len()
            }
        );
        assert!(!reader.is_dirty());
        assert_eq!(reader.path(), Some(path.as_path()));
    }

    #[test]
    fn new_document_always_resets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut s = session();
        s.append("draft");
        s.save_as(&path).unwrap();
        s.append(" more");
        assert!(s.is_dirty());

        let event = s.new_document();

        assert_eq!(event, SessionEvent::Created);
        assert!(!s.is_dirty());
        assert_eq!(s.path(), None);
        assert_eq!(s.content(), "");
        assert_eq!(s.state(), DocumentState::Unsaved);
        assert!(!s.can_undo());
    }

    #[test]
    fn edit_marks_dirty_and_save_cleans() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "abc").unwrap();
        let mut s = session();
        s.open(&path).unwrap();
        assert!(!s.is_dirty());

        s.insert(1, "X").unwrap();
        assert!(s.is_dirty());
        assert_eq!(s.content(), "aXbc");

        let event = s.save(|| panic!("path is known, no prompt expected")).unwrap();
        assert_eq!(
            event,
            SessionEvent::Saved {
                path: path.clone(),
                bytes: 4
            }
        );
        assert!(!s.is_dirty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "aXbc");
    }

    #[test]
    fn save_without_path_uses_prompted_destination() {
        let dir = tempdir().unwrap();
        let chosen = dir.path().join("chosen.txt");
        let mut s = session();
        s.append("hello");

        let event = s.save(|| Some(chosen.clone())).unwrap();

        assert_eq!(
            event,
            SessionEvent::Saved {
                path: chosen.clone(),
                bytes: 5
            }
        );
        assert_eq!(s.path(), Some(chosen.as_path()));
        assert_eq!(s.state(), DocumentState::Clean);
        assert_eq!(fs::read_to_string(&chosen).unwrap(), "hello");
    }

    #[test]
    fn cancelled_prompt_leaves_state_untouched() {
        let mut s = session();
        s.append("hello");

        let event = s.save(|| None).unwrap();

        assert_eq!(event, SessionEvent::SaveCancelled);
        assert!(s.is_dirty());
        assert_eq!(s.path(), None);
    }

    #[test]
    fn save_as_writes_exact_path() {
        let dir = tempdir().unwrap();
        let mut s = session();
        s.append("x");

        s.save_as(dir.path().join("readme")).unwrap();
        assert_eq!(s.path(), Some(dir.path().join("readme").as_path()));
        assert!(!dir.path().join("readme.txt").exists());

        s.save_as(dir.path().join("main.rs")).unwrap();
        assert_eq!(s.path(), Some(dir.path().join("main.rs").as_path()));
    }

    #[test]
    fn extensionless_paths_round_trip() {
        let dir = tempdir().unwrap();
        for name in ["Makefile", ".bashrc", "LICENSE"] {
            let path = dir.path().join(name);
            let text = format!("contents of {name}\n");
            let mut writer = session();
            writer.append(&text);
            writer.save_as(&path).unwrap();

            let mut reader = session();
            reader.open(&path).unwrap();
            assert_eq!(reader.content(), text);
            assert_eq!(reader.path(), Some(path.as_path()));
        }
    }

    #[test]
    fn open_missing_file_keeps_session() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("kept.txt");
        fs::write(&existing, "kept").unwrap();
        let mut s = session();
        s.open(&existing).unwrap();
        s.append("!");

        let err = s.open(dir.path().join("missing.txt")).unwrap_err();

        assert_eq!(err.kind, SessionErrorKind::Io);
        assert_eq!(s.content(), "kept!");
        assert_eq!(s.path(), Some(existing.as_path()));
        assert!(s.is_dirty());
        assert!(s.can_undo());
    }

    #[test]
    fn open_invalid_utf8_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        let mut s = session();

        let err = s.open(&path).unwrap_err();
        assert_eq!(err.kind, SessionErrorKind::Io);
        assert_eq!(s.path(), None);
    }

    #[test]
    fn failed_save_as_keeps_dirty_and_path() {
        let dir = tempdir().unwrap();
        // A regular file used as a directory: unwritable even for root.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut s = session();
        s.append("unsaved work");

        let err = s.save_as(blocker.join("file.txt")).unwrap_err();

        assert_eq!(err.kind, SessionErrorKind::Io);
        assert!(s.is_dirty());
        assert_eq!(s.path(), None);
        assert_eq!(s.content(), "unsaved work");
    }

    #[test]
    fn undo_with_empty_history_is_informational() {
        let mut s = session();

        let err = s.undo().unwrap_err();
        assert_eq!(err.kind, SessionErrorKind::EmptyHistory);
        assert!(err.is_informational());

        let err = s.redo().unwrap_err();
        assert_eq!(err.kind, SessionErrorKind::EmptyHistory);
        assert_eq!(s.state(), DocumentState::Unsaved);
    }

    #[test]
    fn undo_redo_walk_edits_and_mark_dirty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut s = session();
        s.append("one");
        s.append(" two");
        s.save_as(&path).unwrap();

        assert_eq!(s.undo(), Ok(SessionEvent::Undone));
        assert_eq!(s.content(), "one");
        assert!(s.is_dirty());

        s.redo().unwrap();
        assert_eq!(s.content(), "one two");

        s.undo().unwrap();
        s.append(" three");
        assert!(!s.can_redo());
        assert_eq!(s.content(), "one three");
    }

    #[test]
    fn invalid_edits_change_nothing() {
        let mut s = session();
        s.append("héllo");

        assert_eq!(
            s.insert(2, "x").unwrap_err().kind,
            SessionErrorKind::InvalidEdit
        );
        assert_eq!(
            s.insert(100, "x").unwrap_err().kind,
            SessionErrorKind::InvalidEdit
        );
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 3..1;
        assert_eq!(
            s.delete(reversed).unwrap_err().kind,
            SessionErrorKind::InvalidEdit
        );
        assert_eq!(s.content(), "héllo");

        s.delete(0..1).unwrap();
        assert_eq!(s.content(), "éllo");
    }

    #[test]
    fn noop_edits_do_not_dirty() {
        let mut s = session();
        s.append("");
        s.insert(0, "").unwrap();
        s.replace_all("");
        assert!(!s.is_dirty());
        assert!(!s.can_undo());
    }

    #[test]
    fn dispose_never_saved_is_noop() {
        let platform = RecordingPlatform {
            trash_supported: true,
            ..Default::default()
        };
        let mut s = session();
        s.append("draft");

        assert_eq!(s.dispose(&platform), Ok(SessionEvent::NothingToDispose));
        assert_eq!(s.content(), "draft");
    }

    #[test]
    fn dispose_without_trash_support_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut s = session();
        s.append("x");
        s.save_as(&path).unwrap();

        let unix = UnixDesktop::new("lpr", Vec::new(), dir.path().join("p.txt"));
        let event = s.dispose(&unix).unwrap();

        assert_eq!(
            event,
            SessionEvent::DisposeUnavailable {
                platform: "unix".to_string()
            }
        );
        assert!(path.exists());
        assert_eq!(s.path(), Some(path.as_path()));
    }

    #[test]
    fn dispose_moves_file_and_resets_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let bin = dir.path().join("Recycle Bin");
        let mut s = session();
        s.append("to be binned");
        s.save_as(&path).unwrap();

        let windows = WindowsDesktop::new(Some(bin.clone()), "powershell");
        let event = s.dispose(&windows).unwrap();

        assert_eq!(
            event,
            SessionEvent::Disposed {
                from: path.clone(),
                to: bin.join("a.txt")
            }
        );
        assert!(!path.exists());
        assert_eq!(s.path(), None);
        assert_eq!(s.content(), "");
        assert!(!s.is_dirty());
    }

    #[test]
    fn failed_dispose_keeps_session() {
        let platform = RecordingPlatform {
            trash_supported: true,
            fail: true,
            ..Default::default()
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut s = session();
        s.append("x");
        s.save_as(&path).unwrap();

        let err = s.dispose(&platform).unwrap_err();
        assert_eq!(err.kind, SessionErrorKind::Io);
        assert_eq!(s.path(), Some(path.as_path()));
        assert_eq!(s.content(), "x");
    }

    #[test]
    fn print_hands_buffer_and_path_to_platform() {
        let platform = RecordingPlatform::default();
        let mut s = session();
        s.append("print me");

        let event = s.print(&platform).unwrap();

        assert_eq!(
            event,
            SessionEvent::Printed {
                platform: "test".to_string()
            }
        );
        assert_eq!(
            platform.printed.borrow().as_slice(),
            &[("print me".to_string(), None)]
        );
    }

    #[test]
    fn print_failure_is_print_error_and_keeps_state() {
        let platform = RecordingPlatform {
            fail: true,
            ..Default::default()
        };
        let mut s = session();
        s.append("x");

        let err = s.print(&platform).unwrap_err();
        assert_eq!(err.kind, SessionErrorKind::Print);
        assert!(s.is_dirty());
    }

    #[test]
    fn print_unsaved_on_windows_is_skipped() {
        let s = session();
        let windows = WindowsDesktop::new(None, "powershell");
        assert_eq!(s.print(&windows), Ok(SessionEvent::PrintSkipped));
    }

    #[test]
    fn title_reflects_name_and_dirty_state() {
        let dir = tempdir().unwrap();
        let mut s = session();
        assert_eq!(s.title(), "Untitled - CodePad");

        s.append("x");
        assert_eq!(s.title(), "*Untitled - CodePad");

        s.save_as(dir.path().join("notes.txt")).unwrap();
        assert_eq!(s.title(), "notes.txt - CodePad");
    }

    #[test]
    fn undo_limit_comes_from_editor_config() {
        let editor = EditorConfig {
            undo_limit: 1,
            ..Default::default()
        };
        let mut s = DocumentSession::new(&editor);
        s.append("a");
        s.append("b");

        s.undo().unwrap();
        assert_eq!(s.content(), "a");
        assert!(s.undo().is_err());
    }
}
