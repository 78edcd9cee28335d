use serde::{Deserialize, Serialize};
use std::fmt;

/// A GitHub repository reference decomposed into owner and name.
///
/// Built once from a validated input string and never mutated afterwards.
/// `url` keeps the input verbatim because it is what the fetch tool receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
    pub url: String,
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// How a fetched workspace can be previewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    /// A dependency manifest sits at the workspace root
    DependencyManaged,
    /// No manifest, but an entry-point page exists
    Static,
    /// Nothing to preview
    Empty,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::DependencyManaged => "dependency_managed",
            ProjectKind::Static => "static",
            ProjectKind::Empty => "empty",
        }
    }
}

/// Operator answer when the target workspace directory already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    Overwrite,
    Rename,
    Cancel,
}

/// Operator answer once the preview has been shut down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupDecision {
    /// Remove the owner directory and every project under it
    DeleteAll,
    /// Remove only the project that was just reviewed
    DeleteProjectOnly,
    /// Leave everything on disk
    Keep,
}

impl CleanupDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupDecision::DeleteAll => "delete_all",
            CleanupDecision::DeleteProjectOnly => "delete_project_only",
            CleanupDecision::Keep => "keep",
        }
    }
}

/// States of the review workflow.
///
/// `Failed` absorbs from any state; `Cancelled` is only reachable from `Resolving`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceState {
    Unresolved,
    Resolving,
    Fetching,
    Classified(ProjectKind),
    Serving,
    AwaitingShutdown,
    CleaningUp,
    Terminated,
    Failed(String),
    Cancelled,
}

impl WorkspaceState {
    /// True for states the workflow never leaves
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            WorkspaceState::Terminated | WorkspaceState::Failed(_) | WorkspaceState::Cancelled
        )
    }
}

impl fmt::Display for WorkspaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceState::Unresolved => write!(f, "unresolved"),
            WorkspaceState::Resolving => write!(f, "resolving"),
            WorkspaceState::Fetching => write!(f, "fetching"),
            WorkspaceState::Classified(kind) => write!(f, "classified({})", kind.as_str()),
            WorkspaceState::Serving => write!(f, "serving"),
            WorkspaceState::AwaitingShutdown => write!(f, "awaiting_shutdown"),
            WorkspaceState::CleaningUp => write!(f, "cleaning_up"),
            WorkspaceState::Terminated => write!(f, "terminated"),
            WorkspaceState::Failed(reason) => write!(f, "failed({})", reason),
            WorkspaceState::Cancelled => write!(f, "cancelled"),
        }
    }
}
