use codecheck_config::ConfigError;
use codecheck_core::PromptError;
use codecheck_git_utils::{FetchError, ReferenceError};
use codecheck_preview::PreviewError;
use codecheck_workspace::{CleanupError, WorkspaceError};
use std::path::PathBuf;
use thiserror::Error;

/// Every way a review can end unsuccessfully
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    InvalidReference(#[from] ReferenceError),

    #[error("Operation cancelled, {path} was left as it is")]
    UserCancelled { path: PathBuf },

    #[error("Could not create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{0}. The fetched files were kept")]
    DependencyInstall(#[source] PreviewError),

    #[error(transparent)]
    ServerLaunch(PreviewError),

    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<WorkspaceError> for WorkflowError {
    fn from(error: WorkspaceError) -> Self {
        match error {
            WorkspaceError::DirectoryCreation { path, source } => {
                WorkflowError::DirectoryCreation { path, source }
            }
            WorkspaceError::Cancelled { path } => WorkflowError::UserCancelled { path },
            WorkspaceError::Prompt(e) => WorkflowError::Prompt(e),
        }
    }
}

impl From<PreviewError> for WorkflowError {
    fn from(error: PreviewError) -> Self {
        match error {
            PreviewError::DependencyInstall { .. } => WorkflowError::DependencyInstall(error),
            other => WorkflowError::ServerLaunch(other),
        }
    }
}

impl WorkflowError {
    /// True when the operator chose to stop, as opposed to something failing
    pub fn is_cancellation(&self) -> bool {
        matches!(self, WorkflowError::UserCancelled { .. })
    }
}
