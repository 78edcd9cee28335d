use std::env;
use std::path::PathBuf;

/// Name of the settings file stored in the user's home directory
pub const CONFIG_FILE_NAME: &str = ".codecheckconfig.json";

/// Suffix appended to a workspace directory name when the operator picks "rename"
pub const COPY_SUFFIX: &str = "-copy";

/// Dependency manifest whose presence marks a dependency-managed project
pub const MANIFEST_FILE: &str = "package.json";

/// Entry point served for static projects
pub const ENTRY_POINT_FILE: &str = "index.html";

/// Fixed local port used by the static preview server
pub const DEFAULT_PREVIEW_PORT: u16 = 5543;

/// Get the current user's home directory.
///
/// The HOME variable wins over the platform lookup so tests can redirect it.
pub fn home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    dirs::home_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_suffix_has_no_separator() {
        assert!(!COPY_SUFFIX.contains('/'));
        assert!(!COPY_SUFFIX.contains('\\'));
    }

    #[test]
    fn test_home_dir_resolves() {
        assert!(home_dir().is_some());
    }
}
