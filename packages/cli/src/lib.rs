// ABOUTME: codecheck command line library
// ABOUTME: Review workflow orchestration plus the terminal-facing helpers used by the binary

pub mod editor;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod review;
pub mod setup;

pub use error::WorkflowError;
pub use prompt::TerminalPrompt;
pub use review::{ReviewOptions, ReviewReport, ReviewWorkflow};

#[cfg(test)]
mod tests {
    mod review_tests;
}
