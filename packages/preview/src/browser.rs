// ABOUTME: Opens preview URLs in the operator's default browser
// ABOUTME: Platform helper runs detached and is reaped in the background

use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Spawn `cmd` with null stdio and reap it from a background task.
///
/// Must be called inside a tokio runtime. Returns the child's PID.
pub fn spawn_detached(mut cmd: Command) -> io::Result<Option<u32>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();

    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!("Helper process {:?} exited with {}", pid, status),
            Err(e) => warn!("Failed to wait for helper process {:?}: {}", pid, e),
        }
    });

    Ok(pid)
}

/// Something that can show a URL to the operator
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Uses the platform's URL opener
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/c", "start", "", url]);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        let pid = spawn_detached(Self::command(url))?;
        debug!("Opened {} in browser (pid {:?})", url, pid);
        Ok(())
    }
}

/// Never opens anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBrowser;

impl BrowserLauncher for NoBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        debug!("Browser launch disabled, not opening {}", url);
        Ok(())
    }
}
