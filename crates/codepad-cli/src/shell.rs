//! Line-oriented editor shell.
//!
//! Reads one command per line and drives a [`DocumentSession`]. Lines starting
//! with `:` are commands; every other line is appended to the buffer. A line
//! starting with `::` appends the text after the first colon. Session events
//! and errors are rendered here and nowhere else.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use codepad_core::config::EditorConfig;
use codepad_core::platform::PlatformActions;
use codepad_core::session::{DocumentSession, SessionError, SessionEvent, SessionResult};
use serde_json::json;

const HELP: &str = "\
Commands:
  :new[!]          start an empty document
  :open[!] PATH    open a file
  :w               save (asks for a path if the document is untitled)
  :w PATH          save as PATH
  :undo  :redo     step through edit history
  :print           print the document
  :trash           move the saved file to the trash
  :title           show the window title
  :show            show the buffer
  :q[!]            quit
Other lines are appended to the buffer; start a line with :: to append a literal ':'.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    New { force: bool },
    Open { path: PathBuf, force: bool },
    Save,
    SaveAs(PathBuf),
    Undo,
    Redo,
    Print,
    Trash,
    Title,
    Show,
    Quit { force: bool },
    Help,
    Text(String),
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    if let Some(text) = line.strip_prefix("::") {
        return Ok(Command::Text(format!(":{text}")));
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Text(line.to_string()));
    };

    let rest = rest.trim();
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    let (name, force) = match name.strip_suffix('!') {
        Some(name) => (name, true),
        None => (name, false),
    };

    match (name, arg) {
        ("new", None) => Ok(Command::New { force }),
        ("open" | "e", Some(path)) => Ok(Command::Open {
            path: PathBuf::from(path),
            force,
        }),
        ("open" | "e", None) => Err("usage: :open PATH".to_string()),
        ("w" | "save", None) => Ok(Command::Save),
        ("w" | "save", Some(path)) => Ok(Command::SaveAs(PathBuf::from(path))),
        ("undo" | "u", None) => Ok(Command::Undo),
        ("redo", None) => Ok(Command::Redo),
        ("print", None) => Ok(Command::Print),
        ("trash", None) => Ok(Command::Trash),
        ("title", None) => Ok(Command::Title),
        ("show", None) => Ok(Command::Show),
        ("q" | "quit", None) => Ok(Command::Quit { force }),
        ("help" | "h", None) => Ok(Command::Help),
        _ => Err(format!("unknown command ':{rest}' (try :help)")),
    }
}

/// Reads a destination for an untitled save; empty input or EOF cancels.
///
/// In JSON mode the prompt is its own `{"type":"prompt"}` line so every line
/// of output stays parseable.
fn prompt_save_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    json: bool,
) -> Option<PathBuf> {
    let asked = if json {
        serde_json::to_writer(&mut *output, &json!({ "type": "prompt", "message": "Save as" }))
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(output))
    } else {
        write!(output, "Save as: ")
    }
    .and_then(|()| output.flush());
    if let Err(err) = asked {
        tracing::warn!(error = %err, "failed to write save prompt");
        return None;
    }

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => {
            let path = line.trim();
            (!path.is_empty()).then(|| PathBuf::from(path))
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to read save destination");
            None
        }
    }
}

pub struct Shell<'a, R, W> {
    session: DocumentSession,
    actions: &'a dyn PlatformActions,
    input: R,
    output: W,
    editor: EditorConfig,
    json: bool,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        session: DocumentSession,
        actions: &'a dyn PlatformActions,
        input: R,
        output: W,
        editor: EditorConfig,
        json: bool,
    ) -> Self {
        Self {
            session,
            actions,
            input,
            output,
            editor,
            json,
        }
    }

    /// Opens the file given on the command line; failures are rendered, not fatal.
    pub fn open_at_startup(&mut self, path: &Path) -> Result<()> {
        let result = self.session.open(path);
        self.render(result)
    }

    /// Runs until `:q` or end of input.
    pub fn run(&mut self) -> Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.input.read_line(&mut line).context("read command")?;
            if read == 0 {
                tracing::debug!("end of input, leaving shell");
                return Ok(());
            }

            let line = line.trim_end_matches(['\n', '\r']);
            let command = match parse_command(line) {
                Ok(command) => command,
                Err(message) => {
                    self.warn(&message)?;
                    continue;
                }
            };
            if !self.dispatch(command)? {
                return Ok(());
            }
        }
    }

    /// Executes one command. Returns `false` when the shell should exit.
    fn dispatch(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Text(text) => {
                self.session.append(&format!("{text}\n"));
            }
            Command::New { force } => {
                if self.refuse_if_dirty(force, ":new!")? {
                    return Ok(true);
                }
                let event = self.session.new_document();
                self.render(Ok(event))?;
            }
            Command::Open { path, force } => {
                if self.refuse_if_dirty(force, ":open!")? {
                    return Ok(true);
                }
                let result = self.session.open(&path);
                self.render(result)?;
            }
            Command::Save => {
                let (input, output, json) = (&mut self.input, &mut self.output, self.json);
                let editor = &self.editor;
                let result = self.session.save(|| {
                    prompt_save_path(input, output, json)
                        .map(|path| editor.with_default_extension(&path))
                });
                self.render(result)?;
            }
            Command::SaveAs(path) => {
                let result = self.session.save_as(path);
                self.render(result)?;
            }
            Command::Undo => {
                let result = self.session.undo();
                self.render(result)?;
            }
            Command::Redo => {
                let result = self.session.redo();
                self.render(result)?;
            }
            Command::Print => {
                let result = self.session.print(self.actions);
                self.render(result)?;
            }
            Command::Trash => {
                let result = self.session.dispose(self.actions);
                self.render(result)?;
            }
            Command::Title => {
                let title = self.session.title();
                self.line(&title, json!({ "type": "title", "title": title }))?;
            }
            Command::Show => {
                let content = self.session.content().to_string();
                if self.json {
                    self.emit_json(&json!({ "type": "content", "content": content }))?;
                } else {
                    write!(self.output, "{content}").context("write buffer")?;
                    self.output.flush().context("flush output")?;
                }
            }
            Command::Help => {
                self.line(HELP, json!({ "type": "help", "text": HELP }))?;
            }
            Command::Quit { force } => {
                if self.refuse_if_dirty(force, ":q!")? {
                    return Ok(true);
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Guards destructive commands against discarding unsaved edits.
    fn refuse_if_dirty(&mut self, force: bool, override_cmd: &str) -> Result<bool> {
        if force || !self.session.is_dirty() {
            return Ok(false);
        }
        self.warn(&format!(
            "unsaved changes in {} (save with :w or use {override_cmd})",
            self.session.title()
        ))?;
        Ok(true)
    }

    /// Renders the outcome of a session operation.
    fn render(&mut self, result: SessionResult<SessionEvent>) -> Result<()> {
        match result {
            Ok(event) => {
                if self.json {
                    let value = serde_json::to_value(&event).context("serialize event")?;
                    self.emit_json(&value)
                } else {
                    writeln!(self.output, "{event}").context("write event")
                }
            }
            Err(err) => self.render_error(&err),
        }
    }

    fn render_error(&mut self, err: &SessionError) -> Result<()> {
        if self.json {
            return self.emit_json(&json!({
                "type": "error",
                "kind": err.kind,
                "message": err.message,
                "details": err.details,
            }));
        }
        let label = if err.is_informational() { "note" } else { "error" };
        writeln!(self.output, "{label}: {err}").context("write error")
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        if self.json {
            return self.emit_json(&json!({ "type": "warning", "message": message }));
        }
        writeln!(self.output, "warning: {message}").context("write warning")
    }

    fn line(&mut self, text: &str, value: serde_json::Value) -> Result<()> {
        if self.json {
            return self.emit_json(&value);
        }
        writeln!(self.output, "{text}").context("write output")
    }

    fn emit_json(&mut self, value: &serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.output, value).context("write json")?;
        writeln!(self.output).context("write json")
    }
}
