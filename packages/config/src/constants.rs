// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across codecheck

// Settings
pub const CODECHECK_CONFIG: &str = "CODECHECK_CONFIG";

// Preview Configuration
pub const CODECHECK_PREVIEW_PORT: &str = "CODECHECK_PREVIEW_PORT";
pub const CODECHECK_NO_BROWSER: &str = "CODECHECK_NO_BROWSER";
pub const CODECHECK_NO_EDITOR: &str = "CODECHECK_NO_EDITOR";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";

/// True when a boolean-ish flag variable is set to a truthy value
pub fn env_flag(var_name: &str) -> bool {
    std::env::var(var_name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_flag_truthy() {
        std::env::set_var("CODECHECK_TEST_FLAG", "TRUE");
        assert!(env_flag("CODECHECK_TEST_FLAG"));
        std::env::set_var("CODECHECK_TEST_FLAG", "1");
        assert!(env_flag("CODECHECK_TEST_FLAG"));
        std::env::remove_var("CODECHECK_TEST_FLAG");
    }

    #[test]
    #[serial]
    fn test_env_flag_falsy() {
        std::env::remove_var("CODECHECK_TEST_FLAG_UNSET");
        assert!(!env_flag("CODECHECK_TEST_FLAG_UNSET"));
        std::env::set_var("CODECHECK_TEST_FLAG_OFF", "0");
        assert!(!env_flag("CODECHECK_TEST_FLAG_OFF"));
        std::env::remove_var("CODECHECK_TEST_FLAG_OFF");
    }
}
