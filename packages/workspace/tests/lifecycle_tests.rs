// ABOUTME: Integration tests for workspace negotiation and cleanup
// ABOUTME: Drives the resolver with scripted operator answers against a temp root

use codecheck_core::{
    CleanupContext, CleanupDecision, ConflictAction, OperatorPrompt, PromptError,
    RepositoryReference,
};
use codecheck_workspace::{
    sibling_projects, CleanupCoordinator, CleanupOutcome, WorkspaceError, WorkspaceResolver,
};
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct ScriptedPrompt {
    actions: VecDeque<ConflictAction>,
    conflicts_seen: Vec<PathBuf>,
}

impl ScriptedPrompt {
    fn new(actions: &[ConflictAction]) -> Self {
        Self {
            actions: actions.iter().copied().collect(),
            conflicts_seen: Vec::new(),
        }
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn choose_conflict_action(&mut self, path: &Path) -> Result<ConflictAction, PromptError> {
        self.conflicts_seen.push(path.to_path_buf());
        self.actions.pop_front().ok_or(PromptError::Interrupted)
    }

    fn choose_cleanup(&mut self, _: &CleanupContext) -> Result<CleanupDecision, PromptError> {
        Ok(CleanupDecision::Keep)
    }
}

fn reference() -> RepositoryReference {
    RepositoryReference {
        owner: "acme".to_string(),
        name: "widgets".to_string(),
        url: "https://github.com/acme/widgets".to_string(),
    }
}

fn populate(path: &Path) {
    fs::create_dir_all(path).unwrap();
    fs::write(path.join("index.html"), "<h1>hi</h1>").unwrap();
}

#[tokio::test]
async fn test_rename_reaches_first_free_copy_suffix() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = WorkspaceResolver::new(temp_dir.path());
    let base = resolver.resolve(&reference());
    let user_root = resolver.ensure_user_root(&reference()).await.unwrap();
    populate(&base);
    populate(&user_root.join("widgets-copy"));
    populate(&user_root.join("widgets-copy-copy"));

    let mut prompt = ScriptedPrompt::new(&[ConflictAction::Rename]);
    let settled = resolver.negotiate(base.clone(), &mut prompt).await.unwrap();

    assert_eq!(settled, user_root.join("widgets-copy-copy-copy"));
    assert!(!settled.exists());
    // Existing content is untouched
    assert!(base.join("index.html").is_file());
    assert_eq!(prompt.conflicts_seen, vec![base]);
}

#[tokio::test]
async fn test_overwrite_clears_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = WorkspaceResolver::new(temp_dir.path());
    let base = resolver.resolve(&reference());
    populate(&base);

    let mut prompt = ScriptedPrompt::new(&[ConflictAction::Overwrite]);
    let settled = resolver.negotiate(base.clone(), &mut prompt).await.unwrap();

    assert_eq!(settled, base);
    assert!(!base.exists());
}

#[tokio::test]
async fn test_cancel_deletes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = WorkspaceResolver::new(temp_dir.path());
    let base = resolver.resolve(&reference());
    populate(&base);

    let mut prompt = ScriptedPrompt::new(&[ConflictAction::Cancel]);
    let result = resolver.negotiate(base.clone(), &mut prompt).await;

    assert!(matches!(result, Err(WorkspaceError::Cancelled { .. })));
    assert!(base.join("index.html").is_file());
}

#[tokio::test]
async fn test_failed_overwrite_asks_again() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = WorkspaceResolver::new(temp_dir.path());
    let user_root = resolver.ensure_user_root(&reference()).await.unwrap();
    let base = resolver.resolve(&reference());
    // A plain file cannot be removed as a directory, so the conflict survives overwrite
    fs::write(&base, "not a directory").unwrap();

    let mut prompt = ScriptedPrompt::new(&[ConflictAction::Overwrite, ConflictAction::Rename]);
    let settled = resolver.negotiate(base.clone(), &mut prompt).await.unwrap();

    assert_eq!(settled, user_root.join("widgets-copy"));
    assert_eq!(prompt.conflicts_seen, vec![base.clone(), base.clone()]);
    assert!(base.is_file());
}

#[cfg(unix)]
#[tokio::test]
async fn test_dangling_symlink_is_a_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = WorkspaceResolver::new(temp_dir.path());
    let user_root = resolver.ensure_user_root(&reference()).await.unwrap();
    let base = resolver.resolve(&reference());
    std::os::unix::fs::symlink(temp_dir.path().join("gone"), &base).unwrap();

    let mut prompt = ScriptedPrompt::new(&[ConflictAction::Rename]);
    let settled = resolver.negotiate(base.clone(), &mut prompt).await.unwrap();

    assert_eq!(settled, user_root.join("widgets-copy"));
    assert_eq!(prompt.conflicts_seen, vec![base]);
}

#[tokio::test]
async fn test_delete_project_only_keeps_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let user_root = temp_dir.path().join("acme");
    let project = user_root.join("widgets");
    let sibling = user_root.join("gadgets");
    populate(&project);
    populate(&sibling);

    let outcome = CleanupCoordinator::new()
        .cleanup(CleanupDecision::DeleteProjectOnly, &project, &user_root)
        .await
        .unwrap();

    assert_eq!(outcome, CleanupOutcome::Removed(project.clone()));
    assert!(!project.exists());
    assert!(sibling.join("index.html").is_file());
}

#[tokio::test]
async fn test_delete_all_removes_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let user_root = temp_dir.path().join("acme");
    let project = user_root.join("widgets");
    populate(&project);
    populate(&user_root.join("gadgets"));

    assert_eq!(
        sibling_projects(&user_root).await,
        vec!["gadgets".to_string(), "widgets".to_string()]
    );

    CleanupCoordinator::new()
        .cleanup(CleanupDecision::DeleteAll, &project, &user_root)
        .await
        .unwrap();

    assert!(!user_root.exists());
    assert!(temp_dir.path().exists());
}

#[tokio::test]
async fn test_keep_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let user_root = temp_dir.path().join("acme");
    let project = user_root.join("widgets");
    populate(&project);

    let outcome = CleanupCoordinator::new()
        .cleanup(CleanupDecision::Keep, &project, &user_root)
        .await
        .unwrap();

    assert_eq!(outcome, CleanupOutcome::Kept);
    assert!(project.join("index.html").is_file());
}

#[tokio::test]
async fn test_missing_target_counts_as_removed() {
    let temp_dir = TempDir::new().unwrap();
    let user_root = temp_dir.path().join("acme");
    let project = user_root.join("widgets");

    let outcome = CleanupCoordinator::new()
        .cleanup(CleanupDecision::DeleteProjectOnly, &project, &user_root)
        .await
        .unwrap();

    assert_eq!(outcome, CleanupOutcome::AlreadyAbsent(project));
    assert!(sibling_projects(&user_root).await.is_empty());
}
