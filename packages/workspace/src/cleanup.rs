// ABOUTME: Reclaims workspace directories once the preview has stopped
// ABOUTME: Performs at most one deletion per decision

use crate::error::CleanupError;
use codecheck_core::CleanupDecision;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// What a cleanup actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed(PathBuf),
    /// The target was already gone
    AlreadyAbsent(PathBuf),
    Kept,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CleanupCoordinator;

impl CleanupCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Apply the operator's decision to `project` and its owner directory `user_root`
    pub async fn cleanup(
        &self,
        decision: CleanupDecision,
        project: &Path,
        user_root: &Path,
    ) -> Result<CleanupOutcome, CleanupError> {
        let target = match decision {
            CleanupDecision::DeleteAll => user_root,
            CleanupDecision::DeleteProjectOnly => project,
            CleanupDecision::Keep => {
                debug!("Keeping {}", project.display());
                return Ok(CleanupOutcome::Kept);
            }
        };

        match fs::remove_dir_all(target).await {
            Ok(()) => {
                info!("Deleted {}", target.display());
                Ok(CleanupOutcome::Removed(target.to_path_buf()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} was already removed", target.display());
                Ok(CleanupOutcome::AlreadyAbsent(target.to_path_buf()))
            }
            Err(source) => Err(CleanupError {
                path: target.to_path_buf(),
                source,
            }),
        }
    }
}

/// Names of the project directories under `user_root`, sorted.
///
/// A missing or unreadable directory yields an empty list.
pub async fn sibling_projects(user_root: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let mut entries = match fs::read_dir(user_root).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Could not list {}: {}", user_root.display(), e);
            return names;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_dir = entry
            .file_type()
            .await
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        if is_dir {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    names.sort();
    names
}
