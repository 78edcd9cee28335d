// ABOUTME: Environment variable parsing utilities
// ABOUTME: Provides helper functions for parsing and validating environment variables

use codecheck_config::constants::CODECHECK_PREVIEW_PORT;
use codecheck_core::DEFAULT_PREVIEW_PORT;
use std::str::FromStr;

/// Parse an environment variable with validation
/// Returns the parsed value if it passes validation, otherwise returns the default
/// Logs warnings when environment variables are set but fail validation or parsing
pub fn parse_env_or_default_with_validation<T, F>(var_name: &str, default: T, validator: F) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    F: Fn(T) -> bool,
{
    match std::env::var(var_name) {
        Ok(raw_value) => match raw_value.trim().parse::<T>() {
            Ok(parsed_value) => {
                if validator(parsed_value) {
                    parsed_value
                } else {
                    tracing::warn!(
                        "Environment variable {} has invalid value '{}', using default: {}",
                        var_name,
                        raw_value,
                        default
                    );
                    default
                }
            }
            Err(_) => {
                tracing::warn!(
                    "Environment variable {} has unparseable value '{}', using default: {}",
                    var_name,
                    raw_value,
                    default
                );
                default
            }
        },
        // Variable not set - no warning needed, this is expected behavior
        Err(_) => default,
    }
}

/// Port for the static preview server, honoring `CODECHECK_PREVIEW_PORT`
pub fn preview_port() -> u16 {
    parse_env_or_default_with_validation(CODECHECK_PREVIEW_PORT, DEFAULT_PREVIEW_PORT, |port| {
        port > 0
    })
}
