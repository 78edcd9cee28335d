//! codecheck preview - runs a fetched workspace so it can be reviewed
//!
//! This crate classifies a workspace, installs and starts its dev server or serves
//! it statically, and stops whatever it started when the review ends.

pub mod browser;
pub mod detector;
pub mod env;
pub mod static_server;
pub mod supervisor;
pub mod types;

// Re-export key types and functions for easier use
pub use browser::{spawn_detached, BrowserLauncher, NoBrowser, SystemBrowser};
pub use detector::ProjectDetector;
pub use env::{parse_env_or_default_with_validation, preview_port};
pub use static_server::{StaticServer, StaticServerConfig, StaticServerHandle};
pub use supervisor::{PreviewSupervisor, ProcessSpec, SupervisorConfig, TERMINATION_GRACE};
pub use types::{
    PackageManager, PreviewError, PreviewResult, ProjectDetectionResult, ServerKind,
    StoppedPreview, SupervisedProcess,
};
