// ABOUTME: First-run and `setup` handling for the download directory
// ABOUTME: Asks the operator and persists the answer before any review runs

use crate::error::WorkflowError;
use codecheck_config::{Settings, SettingsStore};
use codecheck_core::PromptError;
use colored::*;
use inquire::{InquireError, Text};
use tracing::debug;

const DEFAULT_DOWNLOAD_DIRECTORY: &str = "codecheck";

/// Ask for a download directory on the terminal
pub fn ask_download_directory(current: Option<&Settings>) -> Result<String, PromptError> {
    let default = current
        .map(|s| s.download_directory.clone())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_DIRECTORY.to_string());

    Text::new("Download directory (relative to your home directory):")
        .with_default(&default)
        .prompt()
        .map_err(|e| match e {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                PromptError::Interrupted
            }
            other => PromptError::Input(other.to_string()),
        })
}

/// Ask with `ask` and persist the answer
pub fn run_setup<F>(store: &SettingsStore, ask: F) -> Result<Settings, WorkflowError>
where
    F: FnOnce(Option<&Settings>) -> Result<String, PromptError>,
{
    let current = store.load_optional()?;
    let answer = ask(current.as_ref())?;
    let settings = Settings::new(answer)?;
    store.save(&settings)?;

    println!("{} Config updated successfully!", "✓".green().bold());
    println!(
        "  Projects will now be cloned to: {}",
        settings.download_directory.cyan()
    );
    Ok(settings)
}

/// Load the settings, running setup first when none are stored yet
pub fn ensure_settings<F>(store: &SettingsStore, ask: F) -> Result<Settings, WorkflowError>
where
    F: FnOnce(Option<&Settings>) -> Result<String, PromptError>,
{
    match store.load_optional()? {
        Some(settings) => {
            debug!("Loaded settings from {}", store.path().display());
            Ok(settings)
        }
        None => {
            println!("{}", "No configuration found, let's set one up.".yellow());
            run_setup(store, ask)
        }
    }
}
