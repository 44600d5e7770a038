//! The ordered policy check set.
//!
//! Each check answers "does this repository violate condition X?" by running
//! one git inspection through the bounded executor and interpreting its
//! output. All four checks run for every repository regardless of earlier
//! failures, so a repository can land in several report categories; only a
//! repository that violates none of them is eligible for an update.

use crate::config::SweepConfig;
use crate::discovery::Repository;
use crate::git::GitClient;
use crate::report::Category;

/// Substring of `git status` output confirming the local branch has nothing
/// to pull from its upstream.
const UP_TO_DATE_MARKER: &str = "Your branch is up to date";

/// One update precondition, named by the condition it detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyCheck {
    /// Current branch differs from the configured target branch.
    NotOnBranch,
    /// Working tree has pending changes, staged or not.
    UncommittedChanges,
    /// Local commits not present on the upstream branch.
    UnpushedCommits,
    /// Local branch is already up to date with its upstream.
    NoRemoteUpdates,
}

impl PolicyCheck {
    /// Fixed evaluation order. The update attempt, if any, strictly follows
    /// the last entry.
    pub const ALL: [PolicyCheck; 4] = [
        PolicyCheck::NotOnBranch,
        PolicyCheck::UncommittedChanges,
        PolicyCheck::UnpushedCommits,
        PolicyCheck::NoRemoteUpdates,
    ];

    /// Report category a violating repository is recorded under.
    pub fn category(self) -> Category {
        match self {
            Self::NotOnBranch => Category::NotOnBranch,
            Self::UncommittedChanges => Category::UncommittedChanges,
            Self::UnpushedCommits => Category::UnpushedCommits,
            Self::NoRemoteUpdates => Category::NoRemoteUpdates,
        }
    }

    /// Evaluate this check against one repository.
    ///
    /// Returns `true` when the repository violates the condition. A failed
    /// inspection yields empty output and reads as "not detected" for the
    /// output-based checks; for the branch check an empty branch name can
    /// never equal the configured target, so an uninspectable repository is
    /// treated as not being on the branch.
    pub async fn violates(
        self,
        git: &GitClient,
        repo: &Repository,
        config: &SweepConfig,
    ) -> bool {
        match self {
            Self::NotOnBranch => {
                git.run(repo.path(), &["rev-parse", "--abbrev-ref", "HEAD"])
                    .await
                    != config.branch
            }
            Self::UncommittedChanges => {
                !git.run(repo.path(), &["status", "--porcelain"])
                    .await
                    .is_empty()
            }
            Self::UnpushedCommits => {
                !git.run(repo.path(), &["cherry", "-v"]).await.is_empty()
            }
            Self::NoRemoteUpdates => {
                if config.fetch {
                    // Refresh remote-tracking state first; inspecting stale
                    // tracking info would confirm a freshness that may no
                    // longer hold upstream.
                    git.run(repo.path(), &["fetch"]).await;
                }
                git.run(repo.path(), &["status", "-uno"])
                    .await
                    .contains(UP_TO_DATE_MARKER)
            }
        }
    }
}

impl std::fmt::Display for PolicyCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOnBranch => write!(f, "not-on-branch"),
            Self::UncommittedChanges => write!(f, "uncommitted-changes"),
            Self::UnpushedCommits => write!(f, "unpushed-commits"),
            Self::NoRemoteUpdates => write!(f, "no-remote-updates"),
        }
    }
}
