// ABOUTME: git CLI wrapper that clones a repository into a workspace directory
// ABOUTME: Classifies clone failures and verifies the resulting checkout

use async_trait::async_trait;
use codecheck_core::RepositoryReference;
use git2::Repository;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Diagnostic fragments git prints when the repository is absent or needs credentials
const NOT_FOUND_MARKERS: [&str; 4] = [
    "not found",
    "could not read",
    "authentication failed",
    "terminal prompts disabled",
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Repository not found or is private. Please check:\n  - URL is correct\n  - Repository is set to public")]
    NotFoundOrPrivate,

    #[error("git clone failed (exit {code})")]
    TransportFailure { code: i32 },

    #[error("Failed to run git: {0}")]
    Unknown(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Outcome of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub destination: PathBuf,
    /// Checked-out branch, when HEAD points at one
    pub branch: Option<String>,
}

/// Materializes remote repository content into a local directory
#[async_trait]
pub trait RepositoryFetcher: Send + Sync {
    async fn fetch(
        &self,
        reference: &RepositoryReference,
        destination: &Path,
    ) -> FetchResult<FetchReport>;
}

/// Fetcher backed by the `git` command line tool
#[derive(Debug, Clone)]
pub struct GitCliFetcher {
    program: String,
    base_args: Vec<String>,
}

impl Default for GitCliFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCliFetcher {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            base_args: Vec::new(),
        }
    }

    /// Use a different program; `base_args` are passed before `clone`
    pub fn with_program(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }

    fn resolve_program(&self) -> FetchResult<PathBuf> {
        let candidate = Path::new(&self.program);
        if candidate.components().count() > 1 {
            return Ok(candidate.to_path_buf());
        }
        which::which(&self.program)
            .map_err(|e| FetchError::Unknown(format!("{} not found in PATH: {}", self.program, e)))
    }
}

#[async_trait]
impl RepositoryFetcher for GitCliFetcher {
    async fn fetch(
        &self,
        reference: &RepositoryReference,
        destination: &Path,
    ) -> FetchResult<FetchReport> {
        let program = self.resolve_program()?;
        info!("Cloning {} into {}", reference.url, destination.display());

        let mut child = Command::new(&program)
            .args(&self.base_args)
            .arg("clone")
            .arg(&reference.url)
            .arg(destination)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        // Echo git's progress to the operator while keeping a copy for classification
        let stderr = child.stderr.take();
        let capture = tokio::spawn(async move {
            match stderr {
                Some(stderr) => echo_and_capture(stderr).await,
                None => String::new(),
            }
        });

        let status = child
            .wait()
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?;
        let diagnostics = capture.await.unwrap_or_default();

        if !status.success() {
            let error = classify_clone_failure(&diagnostics, status.code());
            warn!("Clone of {} failed: {}", reference, error);
            return Err(error);
        }

        let branch = verify_checkout(destination)?;
        debug!(
            "Verified checkout of {} at {} (branch {:?})",
            reference,
            destination.display(),
            branch
        );

        Ok(FetchReport {
            destination: destination.to_path_buf(),
            branch,
        })
    }
}

/// Map a failed clone to a fetch error using git's diagnostic output.
///
/// `code` is `None` when git was terminated by a signal.
pub fn classify_clone_failure(diagnostics: &str, code: Option<i32>) -> FetchError {
    let lowered = diagnostics.to_lowercase();
    if NOT_FOUND_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return FetchError::NotFoundOrPrivate;
    }

    match code {
        Some(code) => FetchError::TransportFailure { code },
        None => FetchError::Unknown("git was terminated by a signal".to_string()),
    }
}

/// Confirm that `destination` holds a git repository, returning its current branch
pub fn verify_checkout(destination: &Path) -> FetchResult<Option<String>> {
    let repo = Repository::open(destination).map_err(|e| {
        FetchError::Unknown(format!(
            "clone did not produce a repository at {}: {}",
            destination.display(),
            e
        ))
    })?;

    let branch = repo
        .head()
        .ok()
        .and_then(|head| head.shorthand().map(|s| s.to_string()));

    Ok(branch)
}

/// Echo `reader` line by line to stderr and return everything read.
///
/// Reads until EOF so the writer never sees a closed pipe; bytes that are not
/// UTF-8 are replaced rather than ending the read.
async fn echo_and_capture<R: AsyncRead + Unpin>(reader: R) -> String {
    let mut reader = BufReader::new(reader);
    let mut captured = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
                eprintln!("{}", line);
                captured.push_str(line);
                captured.push('\n');
            }
            Err(e) => {
                debug!("Stopped reading git output: {}", e);
                break;
            }
        }
    }

    captured
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_capture_survives_invalid_utf8() {
        let output: &[u8] = b"Cloning into 'caf\xe9'...\nremote: Repository not found.\n";
        let captured = echo_and_capture(output).await;

        assert!(captured.contains("Repository not found."));
        assert!(matches!(
            classify_clone_failure(&captured, Some(128)),
            FetchError::NotFoundOrPrivate
        ));
    }

    #[test]
    fn test_classify_not_found() {
        let stderr = "Cloning into 'widgets'...\nremote: Repository not found.\nfatal: repository 'https://github.com/acme/widgets/' not found\n";
        assert!(matches!(
            classify_clone_failure(stderr, Some(128)),
            FetchError::NotFoundOrPrivate
        ));
    }

    #[test]
    fn test_classify_private_repository() {
        let stderr = "fatal: could not read Username for 'https://github.com': terminal prompts disabled\n";
        assert!(matches!(
            classify_clone_failure(stderr, Some(128)),
            FetchError::NotFoundOrPrivate
        ));
    }

    #[test]
    fn test_classify_transport_failure() {
        let stderr = "fatal: unable to access 'https://github.com/acme/widgets/': Could not resolve host: github.com\n";
        match classify_clone_failure(stderr, Some(128)) {
            FetchError::TransportFailure { code } => assert_eq!(code, 128),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_signal_termination() {
        assert!(matches!(
            classify_clone_failure("", None),
            FetchError::Unknown(_)
        ));
    }

    #[test]
    fn test_verify_checkout_on_repository() {
        let temp_dir = TempDir::new().unwrap();
        Repository::init(temp_dir.path()).unwrap();

        // A fresh repository has an unborn HEAD, so no branch is reported
        let branch = verify_checkout(temp_dir.path()).unwrap();
        assert!(branch.is_none());
    }

    #[test]
    fn test_verify_checkout_rejects_plain_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            verify_checkout(temp_dir.path()),
            Err(FetchError::Unknown(_))
        ));
    }

    #[test]
    fn test_resolve_missing_program() {
        let fetcher = GitCliFetcher::with_program("definitely-not-a-real-git-binary", Vec::new());
        assert!(matches!(
            fetcher.resolve_program(),
            Err(FetchError::Unknown(_))
        ));
    }
}
