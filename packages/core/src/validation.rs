// ABOUTME: Validation utilities for repository owner and name components
// ABOUTME: Rejects anything that could escape the workspace root when joined as a path

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("Invalid {field} '{value}': contains path traversal sequence")]
    PathTraversal { field: &'static str, value: String },

    #[error("Invalid {field} '{value}': contains path separator")]
    PathSeparator { field: &'static str, value: String },

    #[error("Invalid {field} '{value}': contains control characters")]
    ControlCharacters { field: &'static str, value: String },
}

/// Validates one component (owner or repository name) of a reference.
///
/// Checks that the component:
/// - Is not empty
/// - Is not exactly `.` or `..`
/// - Does not contain path separators (/ or \)
/// - Does not contain NUL or other control characters
///
/// # Examples
///
/// ```
/// use codecheck_core::validation::validate_component;
///
/// assert!(validate_component("owner", "acme").is_ok());
/// assert!(validate_component("owner", "").is_err());
/// assert!(validate_component("name", "../etc").is_err());
/// ```
pub fn validate_component(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if value == "." || value == ".." {
        return Err(ValidationError::PathTraversal {
            field,
            value: value.to_string(),
        });
    }

    if value.contains('/') || value.contains('\\') {
        return Err(ValidationError::PathSeparator {
            field,
            value: value.to_string(),
        });
    }

    // NUL is a control character, so this also covers it
    if value.chars().any(|c| c.is_control()) {
        return Err(ValidationError::ControlCharacters {
            field,
            value: value.to_string(),
        });
    }

    Ok(())
}
