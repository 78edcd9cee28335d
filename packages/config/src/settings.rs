// ABOUTME: Persisted key-value settings for codecheck
// ABOUTME: Stores the download directory in a JSON file under the home directory

use crate::constants::CODECHECK_CONFIG;
use codecheck_core::{home_dir, CONFIG_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to determine the home directory")]
    HomeNotFound,

    #[error("Download directory cannot be empty")]
    EmptyDownloadDirectory,

    #[error("Could not read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Persisted settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Where repositories are cloned, relative to the home directory unless absolute
    pub download_directory: String,
}

impl Settings {
    pub fn new(download_directory: impl Into<String>) -> ConfigResult<Self> {
        let download_directory = download_directory.into().trim().to_string();
        if download_directory.is_empty() {
            return Err(ConfigError::EmptyDownloadDirectory);
        }
        Ok(Self { download_directory })
    }

    /// Absolute workspace root for this configuration
    pub fn workspace_root(&self, home: &Path) -> PathBuf {
        let raw = self.download_directory.trim();
        let raw = raw.strip_prefix("~/").unwrap_or(raw);
        let candidate = Path::new(raw);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            home.join(candidate)
        }
    }
}

/// JSON file backed settings store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$CODECHECK_CONFIG`, falling back to `~/.codecheckconfig.json`
    pub fn default_location() -> ConfigResult<Self> {
        if let Ok(path) = std::env::var(CODECHECK_CONFIG) {
            if !path.trim().is_empty() {
                return Ok(Self::new(path));
            }
        }
        let home = home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(Self::new(home.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> ConfigResult<Settings> {
        debug!("Reading settings from {}", self.path.display());
        let data = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if settings.download_directory.trim().is_empty() {
            return Err(ConfigError::EmptyDownloadDirectory);
        }
        Ok(settings)
    }

    /// Like `load`, but a missing file is `None` instead of an error
    pub fn load_optional(&self) -> ConfigResult<Option<Settings>> {
        if !self.exists() {
            return Ok(None);
        }
        self.load().map(Some)
    }

    pub fn save(&self, settings: &Settings) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(settings).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        fs::write(&self.path, json).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
