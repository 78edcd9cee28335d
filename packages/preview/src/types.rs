use chrono::{DateTime, Utc};
use codecheck_core::ProjectKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Package manager detected for the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    pub fn lock_file(&self) -> &'static str {
        match self {
            PackageManager::Npm => "package-lock.json",
            PackageManager::Yarn => "yarn.lock",
            PackageManager::Pnpm => "pnpm-lock.yaml",
            PackageManager::Bun => "bun.lockb",
        }
    }
}

/// Project detection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetectionResult {
    pub kind: ProjectKind,
    pub package_manager: PackageManager,
    pub has_lock_file: bool,
    pub scripts: HashMap<String, String>,
    /// Script passed to `<package manager> run`
    pub dev_script: String,
}

/// Which kind of preview is being supervised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerKind {
    /// A child process started from the project's own scripts
    DevServer,
    /// The embedded static file server
    FileServer,
}

impl ServerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerKind::DevServer => "dev_server",
            ServerKind::FileServer => "file_server",
        }
    }
}

/// The preview currently owned by the supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisedProcess {
    pub kind: ServerKind,
    pub pid: Option<u32>,
    pub url: Option<String>,
    pub command: String,
    pub started_at: DateTime<Utc>,
}

/// Report returned once the preview has been stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedPreview {
    pub kind: ServerKind,
    pub pid: Option<u32>,
    /// False when the process could not be confirmed as exited
    pub exited: bool,
}

/// Error types for preview operations
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Dependency installation failed ({command}): {reason}")]
    DependencyInstall { command: String, reason: String },

    #[error("Failed to start preview server ({command}): {reason}")]
    ServerLaunch { command: String, reason: String },

    #[error("Port {port} is already in use")]
    PortInUse { port: u16 },

    #[error("Failed to kill process with PID {pid}: {error}")]
    ProcessKill { pid: u32, error: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for preview operations
pub type PreviewResult<T> = Result<T, PreviewError>;
