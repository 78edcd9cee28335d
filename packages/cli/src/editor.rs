use codecheck_preview::spawn_detached;
use std::io;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// VS Code command line launcher
pub const EDITOR_PROGRAM: &str = "code";

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("VS Code CLI not found")]
    NotInstalled,

    #[error("Could not launch VS Code: {0}")]
    Launch(#[from] io::Error),
}

/// Open `path` in VS Code without waiting for the editor
pub fn open_in_editor(path: &Path) -> Result<(), EditorError> {
    let program = which::which(EDITOR_PROGRAM).map_err(|_| EditorError::NotInstalled)?;
    launch(&program, path)
}

fn launch(program: &Path, path: &Path) -> Result<(), EditorError> {
    let mut cmd = Command::new(program);
    cmd.arg(path);
    spawn_detached(cmd)?;

    debug!("Opened {} in VS Code", path.display());
    Ok(())
}
