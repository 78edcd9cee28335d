// ABOUTME: Operator decision port used by the workspace lifecycle
// ABOUTME: Decisions are requested through a trait so tests can script them

use crate::types::{CleanupDecision, ConflictAction};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt interrupted by the operator")]
    Interrupted,

    #[error("Could not read operator input: {0}")]
    Input(String),
}

/// What the operator is shown before choosing how to clean up
#[derive(Debug, Clone)]
pub struct CleanupContext {
    pub project_path: PathBuf,
    pub user_root: PathBuf,
    /// Every project directory currently under `user_root`, including this one
    pub sibling_projects: Vec<String>,
}

/// Source of operator decisions.
///
/// Each call blocks until the operator answers; no timeout is applied.
pub trait OperatorPrompt {
    /// Ask what to do because `path` already exists
    fn choose_conflict_action(&mut self, path: &Path) -> Result<ConflictAction, PromptError>;

    /// Ask how to reclaim the workspace after the preview has stopped
    fn choose_cleanup(&mut self, context: &CleanupContext) -> Result<CleanupDecision, PromptError>;
}
