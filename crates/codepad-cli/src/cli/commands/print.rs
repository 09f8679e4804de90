//! One-shot print command.

use std::path::Path;

use anyhow::{Context, Result, bail};
use codepad_core::config::Config;
use codepad_core::platform;
use codepad_core::session::{DocumentSession, SessionEvent};

pub fn run(config: &Config, path: &Path) -> Result<()> {
    let actions = platform::detect(config);
    let mut session = DocumentSession::new(&config.editor);
    session.open(path)?;

    let event = session
        .print(actions.as_ref())
        .with_context(|| format!("print {}", path.display()))?;
    if event == SessionEvent::PrintSkipped {
        bail!("{event}");
    }
    println!("{event}");
    Ok(())
}
