//! Interactive edit command.

use std::io;
use std::path::Path;

use anyhow::Result;
use codepad_core::config::Config;
use codepad_core::platform;
use codepad_core::session::DocumentSession;

use crate::shell::Shell;

pub fn run(config: &Config, path: Option<&Path>, json: bool) -> Result<()> {
    let actions = platform::detect(config);
    let session = DocumentSession::new(&config.editor);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(
        session,
        actions.as_ref(),
        stdin.lock(),
        stdout.lock(),
        config.editor.clone(),
        json,
    );

    if let Some(path) = path {
        shell.open_at_startup(path)?;
    }
    shell.run()
}
