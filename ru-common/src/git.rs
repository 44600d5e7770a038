//! Bounded git subprocess execution.
//!
//! Every inspection a policy check performs goes through [`GitClient::run`]:
//! one `git -C <repo> …` invocation under a timeout, reduced on any failure
//! (non-zero exit, spawn error, timeout) to an empty string plus a logged
//! diagnostic with the captured stderr. Callers treat "empty" as "condition
//! not detected", so a single failed inspection degrades one check rather
//! than aborting the repository's evaluation.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Outcome of an update attempt for one repository.
#[derive(Debug, Clone)]
pub struct PullOutcome {
    /// Whether the pull exit-succeeded.
    pub success: bool,
    /// Captured stdout followed by stderr.
    pub output: String,
}

/// Runs git commands scoped to a single repository path at a time.
#[derive(Debug, Clone)]
pub struct GitClient {
    command_timeout: Duration,
    update_timeout: Duration,
}

impl GitClient {
    pub fn new(command_timeout: Duration, update_timeout: Duration) -> Self {
        Self {
            command_timeout,
            update_timeout,
        }
    }

    /// Run one inspection command and return its trimmed stdout.
    ///
    /// Returns an empty string on non-zero exit, spawn failure, or timeout.
    /// A timeout aborts only this invocation; the child is killed when the
    /// in-flight future is dropped.
    pub async fn run(&self, repo: &Path, args: &[&str]) -> String {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(repo)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.command_timeout, cmd.output()).await {
            Err(_) => {
                warn!(
                    repo = %repo.display(),
                    ?args,
                    timeout = ?self.command_timeout,
                    "git command timed out"
                );
                String::new()
            }
            Ok(Err(err)) => {
                warn!(repo = %repo.display(), ?args, %err, "failed to run git");
                String::new()
            }
            Ok(Ok(output)) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(
                    repo = %repo.display(),
                    ?args,
                    status = %output.status,
                    stderr = %stderr.trim(),
                    "git command failed"
                );
                String::new()
            }
            Ok(Ok(output)) => {
                debug!(repo = %repo.display(), ?args, "git command succeeded");
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
        }
    }

    /// Run `git pull` with combined output capture.
    ///
    /// Unlike [`run`](Self::run), failure detail is returned to the caller:
    /// the update step records the outcome per repository instead of
    /// flattening it into "condition not detected".
    pub async fn pull(&self, repo: &Path) -> PullOutcome {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(repo)
            .arg("pull")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.update_timeout, cmd.output()).await {
            Err(_) => PullOutcome {
                success: false,
                output: format!("pull timed out after {:?}", self.update_timeout),
            },
            Ok(Err(err)) => PullOutcome {
                success: false,
                output: format!("failed to run git: {err}"),
            },
            Ok(Ok(output)) => {
                let mut combined =
                    String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                PullOutcome {
                    success: output.status.success(),
                    output: combined,
                }
            }
        }
    }
}
