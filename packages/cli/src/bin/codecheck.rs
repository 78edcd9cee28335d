use clap::{Parser, Subcommand};
use codecheck_cli::logging::init_logging;
use codecheck_cli::setup::{ask_download_directory, ensure_settings, run_setup};
use codecheck_cli::{ReviewOptions, ReviewWorkflow, TerminalPrompt};
use codecheck_config::constants::CODECHECK_NO_EDITOR;
use codecheck_config::{env_flag, ConfigError, SettingsStore};
use codecheck_core::home_dir;
use codecheck_git_utils::GitCliFetcher;
use codecheck_preview::{SupervisorConfig, SystemBrowser};
use colored::*;
use std::process;

#[derive(Parser)]
#[command(name = "codecheck")]
#[command(about = "Clone a GitHub project, preview it locally, and clean up afterwards")]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone and preview a repository
    Review {
        /// https://github.com/<owner>/<repo> or git@github.com:<owner>/<repo>
        repo_url: String,
    },
    /// Choose where repositories are downloaded
    Setup,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let store = SettingsStore::default_location()?;

    match command {
        Commands::Setup => {
            run_setup(&store, ask_download_directory)?;
        }
        Commands::Review { repo_url } => {
            let settings = ensure_settings(&store, ask_download_directory)?;
            let home = home_dir().ok_or(ConfigError::HomeNotFound)?;

            let options = ReviewOptions {
                root: settings.workspace_root(&home),
                supervisor: SupervisorConfig::from_env(),
                open_editor: !env_flag(CODECHECK_NO_EDITOR),
            };
            let mut workflow = ReviewWorkflow::new(
                options,
                GitCliFetcher::new(),
                TerminalPrompt,
                SystemBrowser,
            );

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Could not listen for Ctrl+C, stopping now: {}", e);
                }
            };

            workflow.run(&repo_url, shutdown).await?;
            println!("Shutting down.. Goodbye!");
        }
    }

    Ok(())
}
