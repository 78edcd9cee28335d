// ABOUTME: Maps a repository reference to its workspace directory
// ABOUTME: Negotiates with the operator when that directory already exists

use crate::error::{WorkspaceError, WorkspaceResult};
use codecheck_core::{path_exists, ConflictAction, OperatorPrompt, RepositoryReference, COPY_SUFFIX};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Resolves workspace paths of the form `root/owner/name`
#[derive(Debug, Clone)]
pub struct WorkspaceResolver {
    root: PathBuf,
}

impl WorkspaceResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every project fetched for the reference's owner
    pub fn user_root(&self, reference: &RepositoryReference) -> PathBuf {
        self.root.join(&reference.owner)
    }

    /// Default workspace path for a reference, before any conflict handling
    pub fn resolve(&self, reference: &RepositoryReference) -> PathBuf {
        self.user_root(reference).join(&reference.name)
    }

    /// Create `root/owner` and any missing parents
    pub async fn ensure_user_root(&self, reference: &RepositoryReference) -> WorkspaceResult<PathBuf> {
        let user_root = self.user_root(reference);
        fs::create_dir_all(&user_root)
            .await
            .map_err(|source| WorkspaceError::DirectoryCreation {
                path: user_root.clone(),
                source,
            })?;
        debug!("Ensured user root {}", user_root.display());
        Ok(user_root)
    }

    /// Settle on a path that does not exist yet, asking the operator on every conflict.
    ///
    /// Returns `WorkspaceError::Cancelled` when the operator gives up; nothing is
    /// deleted in that case.
    pub async fn negotiate<P>(&self, path: PathBuf, prompt: &mut P) -> WorkspaceResult<PathBuf>
    where
        P: OperatorPrompt + ?Sized,
    {
        let mut candidate = path;

        while path_exists(&candidate).await {
            let action = prompt.choose_conflict_action(&candidate)?;
            debug!("Conflict at {}: operator chose {:?}", candidate.display(), action);

            match action {
                ConflictAction::Overwrite => {
                    if let Err(e) = fs::remove_dir_all(&candidate).await {
                        warn!("Failed to remove {}: {}", candidate.display(), e);
                        continue;
                    }
                    info!("Removed existing workspace {}", candidate.display());
                }
                ConflictAction::Rename => {
                    candidate = next_free_path(&candidate).await;
                    info!("Using {} instead", candidate.display());
                }
                ConflictAction::Cancel => {
                    return Err(WorkspaceError::Cancelled { path: candidate });
                }
            }
        }

        Ok(candidate)
    }
}

/// `path` with `suffix` appended to its final component
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Append the copy suffix until the path no longer exists
pub async fn next_free_path(path: &Path) -> PathBuf {
    let mut candidate = with_suffix(path, COPY_SUFFIX);
    while path_exists(&candidate).await {
        candidate = with_suffix(&candidate, COPY_SUFFIX);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecheck_core::{CleanupContext, CleanupDecision, PromptError};
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    struct Scripted {
        actions: VecDeque<ConflictAction>,
        asked: Vec<PathBuf>,
    }

    impl Scripted {
        fn new(actions: &[ConflictAction]) -> Self {
            Self {
                actions: actions.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl OperatorPrompt for Scripted {
        fn choose_conflict_action(&mut self, path: &Path) -> Result<ConflictAction, PromptError> {
            self.asked.push(path.to_path_buf());
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

    #[test]
    fn test_resolve_layout() {
        let resolver = WorkspaceResolver::new("/tmp/ws");
        assert_eq!(resolver.resolve(&reference()), PathBuf::from("/tmp/ws/acme/widgets"));
        assert_eq!(resolver.user_root(&reference()), PathBuf::from("/tmp/ws/acme"));
    }

    #[tokio::test]
    async fn test_ensure_user_root_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = WorkspaceResolver::new(temp_dir.path().join("nested/root"));

        let user_root = resolver.ensure_user_root(&reference()).await.unwrap();
        assert!(user_root.is_dir());
        assert!(user_root.ends_with("nested/root/acme"));
    }

    #[tokio::test]
    async fn test_negotiate_free_path_asks_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = WorkspaceResolver::new(temp_dir.path());
        let mut prompt = Scripted::new(&[]);

        let path = resolver.resolve(&reference());
        let settled = resolver.negotiate(path.clone(), &mut prompt).await.unwrap();

        assert_eq!(settled, path);
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_with_suffix_appends_to_last_component() {
        assert_eq!(
            with_suffix(Path::new("/tmp/ws/acme/widgets"), "-copy"),
            PathBuf::from("/tmp/ws/acme/widgets-copy")
        );
    }

    #[tokio::test]
    async fn test_next_free_path_skips_existing_copies() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("widgets");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::create_dir_all(temp_dir.path().join("widgets-copy")).unwrap();

        assert_eq!(
            next_free_path(&base).await,
            temp_dir.path().join("widgets-copy-copy")
        );
    }

    #[tokio::test]
    async fn test_negotiate_prompt_failure() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = WorkspaceResolver::new(temp_dir.path());
        let path = resolver.resolve(&reference());
        std::fs::create_dir_all(&path).unwrap();

        let mut prompt = Scripted::new(&[]);
        let result = resolver.negotiate(path.clone(), &mut prompt).await;

        assert!(matches!(result, Err(WorkspaceError::Prompt(_))));
        assert!(path.is_dir());
    }
}
