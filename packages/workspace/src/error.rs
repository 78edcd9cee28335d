use codecheck_core::PromptError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Could not create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cancelled: {path} already exists")]
    Cancelled { path: PathBuf },

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// A deletion that did not complete
#[derive(Debug, Error)]
#[error("Could not delete {path}: {source}. Remaining files are still on disk at {path}")]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
