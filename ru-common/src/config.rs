//! Sweep configuration and startup validation.
//!
//! Configuration problems are the only fatal errors in a run: everything
//! after [`SweepConfig::validate`] degrades per-repository instead of
//! aborting the sweep.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Branch a repository is expected to be on unless overridden.
pub const DEFAULT_BRANCH: &str = "master";

/// Per-invocation timeout for git inspection commands.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the update (pull) step. Longer than the inspection timeout
/// so a pull over a slow link is not cut off, while a hung one still cannot
/// stall the run forever.
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration errors. All of these terminate the process before any
/// repository work is scheduled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root path {0} does not exist")]
    RootMissing(PathBuf),

    #[error("root path {0} is not a directory")]
    RootNotADirectory(PathBuf),

    #[error("root path {path} is not readable: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("target branch name must not be empty")]
    EmptyBranch,

    #[error("parallelism limit must be at least 1")]
    ZeroJobs,

    #[error("git client not found on PATH: {0}")]
    GitMissing(#[from] which::Error),
}

/// Settings for a single sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Directory tree to sweep for repositories.
    pub root: PathBuf,
    /// Branch a repository must be on to be eligible for an update.
    pub branch: String,
    /// Maximum number of repositories evaluated concurrently.
    pub jobs: usize,
    /// Refresh remote-tracking state before the freshness check. Disabling
    /// this evaluates freshness against possibly-stale tracking info.
    pub fetch: bool,
    /// Per-invocation timeout for git inspection commands.
    pub command_timeout: Duration,
    /// Timeout for the update (pull) step.
    pub update_timeout: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            branch: DEFAULT_BRANCH.to_string(),
            jobs: default_jobs(),
            fetch: true,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            update_timeout: DEFAULT_UPDATE_TIMEOUT,
        }
    }
}

/// Default parallelism limit: ten evaluation units per logical core.
/// Evaluation units spend nearly all their time waiting on git subprocesses,
/// so the pool oversubscribes the cores substantially.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * 10
}

impl SweepConfig {
    /// Validate the configuration before scheduling any work.
    ///
    /// Checks that the root exists, is a directory, and can be enumerated,
    /// that the branch name and parallelism limit are usable, and that a
    /// git client is actually on PATH.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.exists() {
            return Err(ConfigError::RootMissing(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::RootNotADirectory(self.root.clone()));
        }
        if let Err(source) = std::fs::read_dir(&self.root) {
            return Err(ConfigError::RootUnreadable {
                path: self.root.clone(),
                source,
            });
        }
        if self.branch.is_empty() {
            return Err(ConfigError::EmptyBranch);
        }
        if self.jobs == 0 {
            return Err(ConfigError::ZeroJobs);
        }
        which::which("git")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config(root: &std::path::Path) -> SweepConfig {
        SweepConfig {
            root: root.to_path_buf(),
            ..SweepConfig::default()
        }
    }

    #[test]
    fn default_jobs_is_positive() {
        assert!(default_jobs() >= 10);
    }

    #[test]
    fn validate_accepts_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        valid_config(dir.path()).validate().unwrap();
    }

    #[test]
    fn validate_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = valid_config(&dir.path().join("nope"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RootMissing(_))
        ));
    }

    #[test]
    fn validate_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "not a directory").unwrap();
        let config = valid_config(&file);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RootNotADirectory(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_branch() {
        let dir = tempfile::tempdir().unwrap();
        let config = SweepConfig {
            branch: String::new(),
            ..valid_config(dir.path())
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyBranch)));
    }

    #[test]
    fn validate_rejects_zero_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let config = SweepConfig {
            jobs: 0,
            ..valid_config(dir.path())
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroJobs)));
    }
}
