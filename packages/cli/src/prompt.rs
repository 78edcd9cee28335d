// ABOUTME: Terminal implementation of the operator prompt
// ABOUTME: Presents conflict and cleanup choices with inquire selections

use codecheck_core::{
    CleanupContext, CleanupDecision, ConflictAction, OperatorPrompt, PromptError,
};
use colored::*;
use inquire::{InquireError, Select};
use std::fmt;
use std::path::Path;

/// A labelled choice shown in a selection list
struct Choice<T> {
    label: String,
    value: T,
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn map_inquire_error(error: InquireError) -> PromptError {
    match error {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            PromptError::Interrupted
        }
        other => PromptError::Input(other.to_string()),
    }
}

fn conflict_choices() -> Vec<Choice<ConflictAction>> {
    vec![
        Choice {
            label: "Delete and overwrite".to_string(),
            value: ConflictAction::Overwrite,
        },
        Choice {
            label: "Clone with a different name".to_string(),
            value: ConflictAction::Rename,
        },
        Choice {
            label: "Cancel".to_string(),
            value: ConflictAction::Cancel,
        },
    ]
}

fn cleanup_choices(context: &CleanupContext) -> Vec<Choice<CleanupDecision>> {
    vec![
        Choice {
            label: format!(
                "Delete {} and all {} project(s) in it",
                context.user_root.display(),
                context.sibling_projects.len()
            ),
            value: CleanupDecision::DeleteAll,
        },
        Choice {
            label: "Delete this project but keep any others".to_string(),
            value: CleanupDecision::DeleteProjectOnly,
        },
        Choice {
            label: "Keep everything, I'll delete them later".to_string(),
            value: CleanupDecision::Keep,
        },
    ]
}

/// Interactive prompt on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl OperatorPrompt for TerminalPrompt {
    fn choose_conflict_action(&mut self, path: &Path) -> Result<ConflictAction, PromptError> {
        println!();
        println!(
            "{} {} already exists",
            "!".yellow().bold(),
            path.display().to_string().cyan()
        );

        Select::new("Choose an option:", conflict_choices())
            .prompt()
            .map(|choice| choice.value)
            .map_err(map_inquire_error)
    }

    fn choose_cleanup(&mut self, context: &CleanupContext) -> Result<CleanupDecision, PromptError> {
        println!();
        println!("{}", "Review finished. Clean up?".bold());
        if !context.sibling_projects.is_empty() {
            println!(
                "{} Deleting everything also removes these projects in {}:",
                "⚠".yellow().bold(),
                context.user_root.display()
            );
            for name in &context.sibling_projects {
                println!("  • {}", name);
            }
        }

        Select::new("Choose an option:", cleanup_choices(context))
            .prompt()
            .map(|choice| choice.value)
            .map_err(map_inquire_error)
    }
}
