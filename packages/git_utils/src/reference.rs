// ABOUTME: GitHub repository reference parsing (HTTPS and SSH formats)
// ABOUTME: Pure string validation that splits a reference into owner and repository name

use codecheck_core::{validate_component, RepositoryReference, ValidationError};
use once_cell::sync::OnceCell;
use regex::Regex;
use thiserror::Error;

/// Accepted reference shapes:
/// https://github.com/owner/repo[.git][/]
/// git@github.com:owner/repo[.git][/]
const GITHUB_REFERENCE_PATTERN: &str =
    r"^(?:https://github\.com/|git@github\.com:)([^/]+)/([^/]+?)(?:\.git)?/?$";

static GITHUB_REFERENCE: OnceCell<Regex> = OnceCell::new();

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Invalid GitHub URL: '{input}'. Expected https://github.com/<owner>/<repo> or git@github.com:<owner>/<repo>")]
    Invalid { input: String },

    #[error("Invalid GitHub URL: {0}")]
    Component(#[from] ValidationError),

    #[error("Reference pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

fn reference_regex() -> Result<&'static Regex, ReferenceError> {
    Ok(GITHUB_REFERENCE.get_or_try_init(|| Regex::new(GITHUB_REFERENCE_PATTERN))?)
}

/// Parse a repository reference into owner and name.
///
/// # Examples
///
/// ```
/// use codecheck_git_utils::parse_reference;
///
/// let reference = parse_reference("https://github.com/foo/bar.git").unwrap();
/// assert_eq!(reference.owner, "foo");
/// assert_eq!(reference.name, "bar");
/// assert!(parse_reference("https://gitlab.com/foo/bar").is_err());
/// ```
pub fn parse_reference(input: &str) -> Result<RepositoryReference, ReferenceError> {
    let trimmed = input.trim();
    let captures = reference_regex()?
        .captures(trimmed)
        .ok_or_else(|| ReferenceError::Invalid {
            input: input.to_string(),
        })?;

    let owner = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let name = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    validate_component("owner", owner)?;
    validate_component("repository name", name)?;

    Ok(RepositoryReference {
        owner: owner.to_string(),
        name: name.to_string(),
        url: trimmed.to_string(),
    })
}
