// ABOUTME: Shared utility functions for codecheck
// ABOUTME: Path existence and naming helpers

use std::path::Path;
use tokio::fs;

/// Checks if anything occupies a path. Symlinks are not followed, so a dangling
/// link still counts.
pub async fn path_exists(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path).await.is_ok()
}

/// Last component of a path as an owned string, or the full path if there is none
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
