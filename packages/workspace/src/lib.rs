// ABOUTME: Workspace directory lifecycle for codecheck
// ABOUTME: Path resolution with conflict negotiation, and post-review cleanup

pub mod cleanup;
pub mod error;
pub mod resolver;

pub use cleanup::{sibling_projects, CleanupCoordinator, CleanupOutcome};
pub use error::{CleanupError, WorkspaceError, WorkspaceResult};
pub use resolver::{next_free_path, WorkspaceResolver};
