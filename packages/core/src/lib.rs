// ABOUTME: Core types, traits, and utilities for codecheck
// ABOUTME: Foundational package providing shared functionality across all codecheck packages

pub mod constants;
pub mod prompt;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{CleanupDecision, ConflictAction, ProjectKind, RepositoryReference, WorkspaceState};

// Re-export constants
pub use constants::{
    home_dir, CONFIG_FILE_NAME, COPY_SUFFIX, DEFAULT_PREVIEW_PORT, ENTRY_POINT_FILE,
    MANIFEST_FILE,
};

// Re-export the operator port
pub use prompt::{CleanupContext, OperatorPrompt, PromptError};

// Re-export utilities
pub use utils::{dir_name, path_exists};

// Re-export validation
pub use validation::{validate_component, ValidationError};
