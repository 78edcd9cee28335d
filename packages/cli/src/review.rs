// ABOUTME: The review workflow: resolve, fetch, classify, serve, wait, clean up
// ABOUTME: Records every state it passes through so callers can inspect the run

use crate::editor::open_in_editor;
use crate::error::WorkflowError;
use codecheck_core::{
    CleanupContext, CleanupDecision, OperatorPrompt, ProjectKind, RepositoryReference,
    WorkspaceState,
};
use codecheck_git_utils::{parse_reference, RepositoryFetcher};
use codecheck_preview::{
    BrowserLauncher, PreviewSupervisor, ProjectDetector, StoppedPreview, SupervisedProcess,
    SupervisorConfig,
};
use codecheck_workspace::{sibling_projects, CleanupCoordinator, CleanupOutcome, WorkspaceResolver};
use colored::*;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Settings for one review run
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// Root under which `owner/name` workspaces are created
    pub root: PathBuf,
    pub supervisor: SupervisorConfig,
    /// Open the workspace in VS Code once the preview is up
    pub open_editor: bool,
}

/// Summary of a completed review
#[derive(Debug, Clone)]
pub struct ReviewReport {
    pub reference: RepositoryReference,
    pub workspace: PathBuf,
    pub kind: ProjectKind,
    pub preview: Option<SupervisedProcess>,
    pub stopped: Option<StoppedPreview>,
    pub decision: CleanupDecision,
    pub outcome: CleanupOutcome,
}

/// Drives one repository through the workspace lifecycle
pub struct ReviewWorkflow<F, P, B>
where
    F: RepositoryFetcher,
    P: OperatorPrompt,
    B: BrowserLauncher,
{
    fetcher: F,
    prompt: P,
    supervisor: PreviewSupervisor<B>,
    resolver: WorkspaceResolver,
    cleanup: CleanupCoordinator,
    open_editor: bool,
    states: Vec<WorkspaceState>,
}

impl<F, P, B> ReviewWorkflow<F, P, B>
where
    F: RepositoryFetcher,
    P: OperatorPrompt,
    B: BrowserLauncher,
{
    pub fn new(options: ReviewOptions, fetcher: F, prompt: P, browser: B) -> Self {
        Self {
            fetcher,
            prompt,
            supervisor: PreviewSupervisor::new(options.supervisor, browser),
            resolver: WorkspaceResolver::new(options.root),
            cleanup: CleanupCoordinator::new(),
            open_editor: options.open_editor,
            states: vec![WorkspaceState::Unresolved],
        }
    }

    /// States visited so far, oldest first
    pub fn states(&self) -> &[WorkspaceState] {
        &self.states
    }

    pub fn state(&self) -> &WorkspaceState {
        // `states` always starts with `Unresolved`
        &self.states[self.states.len() - 1]
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn browser(&self) -> &B {
        self.supervisor.browser()
    }

    fn transition(&mut self, next: WorkspaceState) {
        debug!("Review state: {} -> {}", self.state(), next);
        self.states.push(next);
    }

    /// Review the repository named by `input`.
    ///
    /// `shutdown` is awaited once the preview is running; the preview is stopped and
    /// cleanup begins when it resolves.
    pub async fn run<S>(&mut self, input: &str, shutdown: S) -> Result<ReviewReport, WorkflowError>
    where
        S: Future<Output = ()>,
    {
        match self.drive(input, shutdown).await {
            Ok(report) => {
                self.transition(WorkspaceState::Terminated);
                Ok(report)
            }
            Err(error) => {
                // Whatever was started must not outlive a failed run
                self.supervisor.shutdown().await;
                if error.is_cancellation() {
                    self.transition(WorkspaceState::Cancelled);
                } else {
                    self.transition(WorkspaceState::Failed(error.to_string()));
                }
                Err(error)
            }
        }
    }

    async fn drive<S>(&mut self, input: &str, shutdown: S) -> Result<ReviewReport, WorkflowError>
    where
        S: Future<Output = ()>,
    {
        let reference = parse_reference(input)?;
        info!("Reviewing {}", reference);

        self.transition(WorkspaceState::Resolving);
        let user_root = self.resolver.ensure_user_root(&reference).await?;
        let target = self.resolver.resolve(&reference);
        let workspace = self.resolver.negotiate(target, &mut self.prompt).await?;

        self.transition(WorkspaceState::Fetching);
        println!(
            "{} Cloning {} into {}",
            "→".blue().bold(),
            reference.to_string().cyan(),
            workspace.display()
        );
        let fetched = self.fetcher.fetch(&reference, &workspace).await?;
        if let Some(branch) = &fetched.branch {
            debug!("Checked out branch {}", branch);
        }

        let kind = ProjectDetector::classify(&workspace);
        self.transition(WorkspaceState::Classified(kind));
        println!("{} Detected a {} project", "✓".green().bold(), describe(kind));

        let preview = self.supervisor.start(kind, &workspace).await?;
        self.transition(WorkspaceState::Serving);

        if let Some(process) = &preview {
            match &process.url {
                Some(url) => println!("{} Serving preview at {}", "🚀".bold(), url.cyan()),
                None => println!("{} Started '{}'", "🚀".bold(), process.command.cyan()),
            }
        }

        if self.open_editor {
            match open_in_editor(&workspace) {
                Ok(()) => println!("{} Opened project in VS Code", "✓".green().bold()),
                Err(e) => warn!("{}", e),
            }
        }

        println!("Press Ctrl + C to stop the review...");
        shutdown.await;
        self.transition(WorkspaceState::AwaitingShutdown);

        let stopped = self.supervisor.shutdown().await;
        if let Some(stopped) = &stopped {
            info!("Preview stopped ({}, exited: {})", stopped.kind.as_str(), stopped.exited);
        }

        self.transition(WorkspaceState::CleaningUp);
        let context = CleanupContext {
            project_path: workspace.clone(),
            user_root: user_root.clone(),
            sibling_projects: sibling_projects(&user_root).await,
        };
        let decision = match self.prompt.choose_cleanup(&context) {
            Ok(decision) => decision,
            Err(e) => {
                warn!("{}; keeping all files", e);
                CleanupDecision::Keep
            }
        };

        let outcome = self.cleanup.cleanup(decision, &workspace, &user_root).await?;
        match decision {
            CleanupDecision::DeleteAll => {
                println!("{} Cleanup successful", "✓".green().bold())
            }
            CleanupDecision::DeleteProjectOnly => println!(
                "{} Project deleted. Other projects in {} are still available",
                "✓".green().bold(),
                user_root.display()
            ),
            CleanupDecision::Keep => println!(
                "All files saved in {}. Don't forget to remove them when done",
                workspace.display()
            ),
        }

        Ok(ReviewReport {
            reference,
            workspace,
            kind,
            preview,
            stopped,
            decision,
            outcome,
        })
    }
}

fn describe(kind: ProjectKind) -> &'static str {
    match kind {
        ProjectKind::DependencyManaged => "package.json",
        ProjectKind::Static => "static",
        ProjectKind::Empty => "empty",
    }
}
