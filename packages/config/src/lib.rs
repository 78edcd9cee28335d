// ABOUTME: Configuration package for codecheck
// ABOUTME: Environment variable names and the persisted settings store

pub mod constants;
pub mod settings;

pub use constants::env_flag;
pub use settings::{ConfigError, ConfigResult, Settings, SettingsStore};
