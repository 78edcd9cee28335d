use crate::types::{PackageManager, PreviewResult, ProjectDetectionResult};
use codecheck_core::{ProjectKind, ENTRY_POINT_FILE, MANIFEST_FILE};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Dev script names in order of preference
const DEV_SCRIPTS: [&str; 3] = ["dev", "start", "serve"];

/// Project detector for analyzing project structure and determining configuration
pub struct ProjectDetector;

impl ProjectDetector {
    /// Decide how a workspace can be previewed.
    ///
    /// A manifest at the root always wins over an entry-point page.
    pub fn classify<P: AsRef<Path>>(workspace: P) -> ProjectKind {
        let workspace = workspace.as_ref();

        if workspace.join(MANIFEST_FILE).is_file() {
            ProjectKind::DependencyManaged
        } else if workspace.join(ENTRY_POINT_FILE).is_file() {
            ProjectKind::Static
        } else {
            ProjectKind::Empty
        }
    }

    /// Classify the workspace and gather what is needed to run it
    pub async fn detect<P: AsRef<Path>>(workspace: P) -> PreviewResult<ProjectDetectionResult> {
        let workspace = workspace.as_ref();
        debug!("Detecting project type in: {}", workspace.display());

        let kind = Self::classify(workspace);
        let scripts = if kind == ProjectKind::DependencyManaged {
            Self::read_scripts(workspace)
        } else {
            HashMap::new()
        };

        let package_manager = Self::detect_package_manager(workspace);
        let has_lock_file = workspace.join(package_manager.lock_file()).exists();
        let dev_script = Self::determine_dev_script(&scripts);

        debug!(
            "Detected {} project ({} via {}, lock file: {})",
            kind.as_str(),
            dev_script,
            package_manager.as_str(),
            has_lock_file
        );

        Ok(ProjectDetectionResult {
            kind,
            package_manager,
            has_lock_file,
            scripts,
            dev_script,
        })
    }

    /// `scripts` table from the manifest; unreadable or invalid manifests yield nothing
    fn read_scripts(workspace: &Path) -> HashMap<String, String> {
        let manifest_path = workspace.join(MANIFEST_FILE);

        let content = match fs::read_to_string(&manifest_path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Could not read {}: {}", manifest_path.display(), e);
                return HashMap::new();
            }
        };

        let manifest: Value = match serde_json::from_str(&content) {
            Ok(manifest) => manifest,
            Err(e) => {
                debug!("Invalid {}: {}", manifest_path.display(), e);
                return HashMap::new();
            }
        };

        manifest
            .get("scripts")
            .and_then(|s| s.as_object())
            .map(|scripts_obj| {
                scripts_obj
                    .iter()
                    .map(|(k, v)| (k.clone(), v.as_str().unwrap_or("").to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn determine_dev_script(scripts: &HashMap<String, String>) -> String {
        DEV_SCRIPTS
            .iter()
            .find(|name| scripts.contains_key(**name))
            .unwrap_or(&DEV_SCRIPTS[0])
            .to_string()
    }

    /// Detect package manager by checking for lock files
    fn detect_package_manager(workspace: &Path) -> PackageManager {
        if workspace.join("bun.lockb").exists() {
            return PackageManager::Bun;
        }

        if workspace.join("pnpm-lock.yaml").exists() {
            return PackageManager::Pnpm;
        }

        if workspace.join("yarn.lock").exists() {
            return PackageManager::Yarn;
        }

        PackageManager::Npm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify_manifest_wins() {
        let temp_dir = TempDir::new().unwrap();
        let project_root = temp_dir.path();

        fs::write(project_root.join("index.html"), "<html></html>").unwrap();
        fs::write(project_root.join("package.json"), "{}").unwrap();

        assert_eq!(
            ProjectDetector::classify(project_root),
            ProjectKind::DependencyManaged
        );
    }

    #[test]
    fn test_classify_static_and_empty() {
        let temp_dir = TempDir::new().unwrap();
        let project_root = temp_dir.path();

        assert_eq!(ProjectDetector::classify(project_root), ProjectKind::Empty);

        fs::write(project_root.join("README.md"), "# hi").unwrap();
        assert_eq!(ProjectDetector::classify(project_root), ProjectKind::Empty);

        fs::write(project_root.join("index.html"), "<html></html>").unwrap();
        assert_eq!(ProjectDetector::classify(project_root), ProjectKind::Static);
    }

    #[test]
    fn test_nested_manifest_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("web");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("package.json"), "{}").unwrap();

        assert_eq!(ProjectDetector::classify(temp_dir.path()), ProjectKind::Empty);
    }

    #[tokio::test]
    async fn test_detect_scripts_and_package_manager() {
        let temp_dir = TempDir::new().unwrap();
        let project_root = temp_dir.path();

        let package_json = serde_json::json!({
            "name": "test-project",
            "scripts": {
                "start": "vite preview",
                "build": "vite build"
            }
        });
        fs::write(project_root.join("package.json"), package_json.to_string()).unwrap();
        fs::write(project_root.join("pnpm-lock.yaml"), "").unwrap();

        let result = ProjectDetector::detect(project_root).await.unwrap();

        assert_eq!(result.kind, ProjectKind::DependencyManaged);
        assert_eq!(result.package_manager, PackageManager::Pnpm);
        assert!(result.has_lock_file);
        assert_eq!(result.dev_script, "start");
        assert_eq!(result.scripts.len(), 2);
    }

    #[tokio::test]
    async fn test_detect_invalid_manifest_keeps_kind() {
        let temp_dir = TempDir::new().unwrap();
        let project_root = temp_dir.path();
        fs::write(project_root.join("package.json"), "{ not json").unwrap();

        let result = ProjectDetector::detect(project_root).await.unwrap();

        assert_eq!(result.kind, ProjectKind::DependencyManaged);
        assert_eq!(result.package_manager, PackageManager::Npm);
        assert!(!result.has_lock_file);
        assert!(result.scripts.is_empty());
        assert_eq!(result.dev_script, "dev");
    }
}
