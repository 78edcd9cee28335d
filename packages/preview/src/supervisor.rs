// ABOUTME: Owns the single preview (dev server child or static server) for a review
// ABOUTME: Installs dependencies, starts the preview, and stops it exactly once

use crate::browser::BrowserLauncher;
use crate::detector::ProjectDetector;
use crate::env::preview_port;
use crate::static_server::{StaticServer, StaticServerConfig, StaticServerHandle};
use crate::types::{
    PreviewError, PreviewResult, ProjectDetectionResult, ServerKind, StoppedPreview,
    SupervisedProcess,
};
use chrono::Utc;
use codecheck_config::{constants::CODECHECK_NO_BROWSER, env_flag};
use codecheck_core::{ProjectKind, DEFAULT_PREVIEW_PORT, ENTRY_POINT_FILE};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// How long a child gets to exit after the termination request
pub const TERMINATION_GRACE: Duration = Duration::from_secs(5);

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Command line as shown to the operator
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self, cwd: &Path) -> Command {
        // Package manager shims are batch files on Windows
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.program);
            cmd
        } else {
            Command::new(&self.program)
        };
        cmd.args(&self.args).current_dir(cwd);
        cmd
    }
}

/// Supervisor settings
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub host: String,
    pub static_port: u16,
    pub open_browser: bool,
    /// Replaces `<package manager> install`
    pub install_override: Option<ProcessSpec>,
    /// Replaces `<package manager> run <script>`
    pub dev_override: Option<ProcessSpec>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            static_port: DEFAULT_PREVIEW_PORT,
            open_browser: true,
            install_override: None,
            dev_override: None,
        }
    }
}

impl SupervisorConfig {
    /// Defaults adjusted by `CODECHECK_PREVIEW_PORT` and `CODECHECK_NO_BROWSER`
    pub fn from_env() -> Self {
        Self {
            static_port: preview_port(),
            open_browser: !env_flag(CODECHECK_NO_BROWSER),
            ..Self::default()
        }
    }
}

enum ActivePreview {
    Child {
        process: SupervisedProcess,
        child: Child,
    },
    Static {
        process: SupervisedProcess,
        handle: StaticServerHandle,
    },
}

/// Runs at most one preview and terminates it on request
pub struct PreviewSupervisor<B: BrowserLauncher> {
    config: SupervisorConfig,
    browser: B,
    active: Option<ActivePreview>,
}

impl<B: BrowserLauncher> PreviewSupervisor<B> {
    pub fn new(config: SupervisorConfig, browser: B) -> Self {
        Self {
            config,
            browser,
            active: None,
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// The running preview, if any
    pub fn active(&self) -> Option<&SupervisedProcess> {
        match &self.active {
            Some(ActivePreview::Child { process, .. }) => Some(process),
            Some(ActivePreview::Static { process, .. }) => Some(process),
            None => None,
        }
    }

    fn install_spec(&self, detection: &ProjectDetectionResult) -> ProcessSpec {
        self.config.install_override.clone().unwrap_or_else(|| {
            ProcessSpec::new(detection.package_manager.as_str(), ["install"])
        })
    }

    fn dev_spec(&self, detection: &ProjectDetectionResult) -> ProcessSpec {
        self.config.dev_override.clone().unwrap_or_else(|| {
            ProcessSpec::new(
                detection.package_manager.as_str(),
                ["run".to_string(), detection.dev_script.clone()],
            )
        })
    }

    /// Run the install command to completion in `workspace`
    pub async fn install_dependencies(
        &self,
        workspace: &Path,
        detection: &ProjectDetectionResult,
    ) -> PreviewResult<()> {
        let spec = self.install_spec(detection);
        let command = spec.display();
        info!("Installing dependencies with '{}' in {}", command, workspace.display());

        let status = spec
            .command(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| PreviewError::DependencyInstall {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(PreviewError::DependencyInstall {
                command,
                reason: format!("exited with {}", status),
            });
        }

        debug!("Dependencies installed");
        Ok(())
    }

    /// Spawn the dev server without waiting for it
    pub async fn start_dev_server(
        &mut self,
        workspace: &Path,
        detection: &ProjectDetectionResult,
    ) -> PreviewResult<SupervisedProcess> {
        self.stop_previous().await;

        let spec = self.dev_spec(detection);
        let command = spec.display();

        let mut cmd = spec.command(workspace);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        // Own process group so termination reaches the whole dev server tree
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|e| PreviewError::ServerLaunch {
            command: command.clone(),
            reason: e.to_string(),
        })?;

        let pid = child.id();
        info!("Spawned dev server with command '{}' and PID: {:?}", command, pid);

        let process = SupervisedProcess {
            kind: ServerKind::DevServer,
            pid,
            url: None,
            command,
            started_at: Utc::now(),
        };
        self.active = Some(ActivePreview::Child {
            process: process.clone(),
            child,
        });
        Ok(process)
    }

    /// Serve `workspace` with the embedded static server.
    ///
    /// Returns `None` when the workspace has no entry point.
    pub async fn start_static(&mut self, workspace: &Path) -> PreviewResult<Option<SupervisedProcess>> {
        if !workspace.join(ENTRY_POINT_FILE).is_file() {
            warn!(
                "No {} in {}, nothing to serve",
                ENTRY_POINT_FILE,
                workspace.display()
            );
            return Ok(None);
        }

        self.stop_previous().await;

        let mut server_config =
            StaticServerConfig::new(workspace.to_path_buf(), self.config.static_port);
        server_config.host = self.config.host.clone();
        let handle = StaticServer::new(server_config).start().await?;
        let url = handle.url();

        if self.config.open_browser {
            if let Err(e) = self.browser.open(&url) {
                warn!("Could not open browser at {}: {}", url, e);
            }
        }

        let process = SupervisedProcess {
            kind: ServerKind::FileServer,
            pid: None,
            url: Some(url.clone()),
            command: format!("static server {}", url),
            started_at: Utc::now(),
        };
        self.active = Some(ActivePreview::Static {
            process: process.clone(),
            handle,
        });
        Ok(Some(process))
    }

    /// Start whatever preview fits `kind`
    pub async fn start(
        &mut self,
        kind: ProjectKind,
        workspace: &Path,
    ) -> PreviewResult<Option<SupervisedProcess>> {
        match kind {
            ProjectKind::DependencyManaged => {
                let detection = ProjectDetector::detect(workspace).await?;
                self.install_dependencies(workspace, &detection).await?;
                self.start_dev_server(workspace, &detection).await.map(Some)
            }
            ProjectKind::Static => self.start_static(workspace).await,
            ProjectKind::Empty => {
                info!("Nothing to preview in {}", workspace.display());
                Ok(None)
            }
        }
    }

    async fn stop_previous(&mut self) {
        if let Some(stopped) = self.shutdown().await {
            warn!("Replaced running preview ({})", stopped.kind.as_str());
        }
    }

    /// Stop the active preview. Later calls return `None`.
    pub async fn shutdown(&mut self) -> Option<StoppedPreview> {
        match self.active.take()? {
            ActivePreview::Child { process, mut child } => {
                let exited = terminate_child(&mut child, process.pid).await;
                Some(StoppedPreview {
                    kind: process.kind,
                    pid: process.pid,
                    exited,
                })
            }
            ActivePreview::Static { process, handle } => {
                handle.stop().await;
                info!("Stopped static server");
                Some(StoppedPreview {
                    kind: process.kind,
                    pid: None,
                    exited: true,
                })
            }
        }
    }
}

/// Ask the child's process group to exit, then force it after the grace period
async fn terminate_child(child: &mut Child, pid: Option<u32>) -> bool {
    if let Ok(Some(status)) = child.try_wait() {
        debug!("Dev server already exited with {}", status);
        // The rest of its process group can outlive the leader
        if let Err(e) = signal_group(pid, false) {
            debug!("No remaining dev server processes: {}", e);
        }
        return true;
    }

    if let Err(e) = signal_group(pid, false) {
        warn!("{}", e);
        if let Err(e) = child.start_kill() {
            warn!("Failed to kill dev server: {}", e);
        }
    }

    match tokio::time::timeout(TERMINATION_GRACE, child.wait()).await {
        Ok(Ok(status)) => {
            info!("Dev server (PID {:?}) exited with {}", pid, status);
            true
        }
        Ok(Err(e)) => {
            warn!("Failed to wait for dev server (PID {:?}): {}", pid, e);
            false
        }
        Err(_) => {
            warn!(
                "Dev server (PID {:?}) still running after {:?}, killing",
                pid, TERMINATION_GRACE
            );
            if let Err(e) = signal_group(pid, true) {
                warn!("{}", e);
            }
            if let Err(e) = child.kill().await {
                warn!("Failed to kill dev server (PID {:?}): {}", pid, e);
                return false;
            }
            true
        }
    }
}

/// Send SIGTERM, or SIGKILL when `force` is set, to the child's process group
#[cfg(unix)]
fn signal_group(pid: Option<u32>, force: bool) -> PreviewResult<()> {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let raw = pid.ok_or_else(|| PreviewError::ProcessKill {
        pid: 0,
        error: "process id unavailable".to_string(),
    })?;
    let group = Pid::from_raw(raw as i32);
    let signal = if force { Signal::SIGKILL } else { Signal::SIGTERM };

    killpg(group, signal).map_err(|e| PreviewError::ProcessKill {
        pid: raw,
        error: e.to_string(),
    })?;
    debug!("Sent {} to process group {}", signal, raw);
    Ok(())
}

#[cfg(not(unix))]
fn signal_group(pid: Option<u32>, _force: bool) -> PreviewResult<()> {
    Err(PreviewError::ProcessKill {
        pid: pid.unwrap_or_default(),
        error: "signals are not supported on this platform".to_string(),
    })
}
