//! The concurrent discovery-evaluate-aggregate engine.
//!
//! Discovery walks the tree on the controlling task and schedules one
//! evaluation unit per repository. A counting semaphore bounds how many
//! units run at once: admission blocks while the pool is saturated and a
//! slot frees only when a running unit completes. The run finishes when
//! discovery has emitted its last repository and every admitted unit has
//! joined; only then does the aggregator give up its report.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::checks::PolicyCheck;
use crate::config::SweepConfig;
use crate::discovery::{RepoWalk, Repository};
use crate::git::{GitClient, PullOutcome};
use crate::report::{AggregateReport, Aggregator, Category};

/// Per-repository outcome of the full policy check set.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Checks the repository violated, in evaluation order.
    pub failed: Vec<PolicyCheck>,
    /// Result of the update attempt; `None` when any check failed.
    pub update: Option<PullOutcome>,
}

/// Drives one full sweep: discovery, bounded evaluation, aggregation.
pub struct Sweeper {
    config: Arc<SweepConfig>,
    git: GitClient,
}

impl Sweeper {
    pub fn new(config: SweepConfig) -> Self {
        let git = GitClient::new(config.command_timeout, config.update_timeout);
        Self {
            config: Arc::new(config),
            git,
        }
    }

    /// Run the sweep to completion and return the categorized report.
    ///
    /// Never returns early: errors inside one repository's evaluation are
    /// confined to that repository, and the report is read only after the
    /// last unit has joined.
    pub async fn run(&self) -> AggregateReport {
        let semaphore = Arc::new(Semaphore::new(self.config.jobs));
        let aggregator = Arc::new(Aggregator::new());
        let mut units = JoinSet::new();

        let mut discovered = 0usize;
        for repo in RepoWalk::new(&self.config.root) {
            discovered += 1;
            // Blocks while the pool is saturated; the permit rides along
            // with the unit and is released when it completes.
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .expect("sweep semaphore closed");
            let git = self.git.clone();
            let config = Arc::clone(&self.config);
            let aggregator = Arc::clone(&aggregator);
            units.spawn(async move {
                let _permit = permit;
                let outcome = evaluate_repository(&git, &repo, &config).await;
                record_outcome(&repo, &outcome, &aggregator);
            });
        }

        while let Some(joined) = units.join_next().await {
            if let Err(err) = joined {
                // A panicking unit loses its own entries but must not take
                // down the rest of the run.
                warn!(%err, "evaluation unit aborted");
            }
        }

        info!(discovered, "sweep complete");

        Arc::try_unwrap(aggregator)
            .expect("evaluation units still hold the aggregator")
            .into_report()
    }
}

/// Run the full check set against one repository, then attempt an update if
/// every check passed. Later checks still run after an earlier failure so
/// the report reflects every violated condition.
async fn evaluate_repository(
    git: &GitClient,
    repo: &Repository,
    config: &SweepConfig,
) -> CheckOutcome {
    let mut failed = Vec::new();
    for check in PolicyCheck::ALL {
        if check.violates(git, repo, config).await {
            debug!(repo = %repo.name(), %check, "check violated");
            failed.push(check);
        }
    }

    if !failed.is_empty() {
        return CheckOutcome {
            failed,
            update: None,
        };
    }

    let pull = git.pull(repo.path()).await;
    if pull.success {
        info!(repo = %repo.name(), output = %pull.output.trim(), "repository updated");
    } else {
        warn!(repo = %repo.name(), output = %pull.output.trim(), "update failed");
    }
    CheckOutcome {
        failed,
        update: Some(pull),
    }
}

/// Write one repository's outcome into the shared aggregator.
fn record_outcome(repo: &Repository, outcome: &CheckOutcome, aggregator: &Aggregator) {
    let name = repo.name();
    for check in &outcome.failed {
        aggregator.append(&name, check.category());
    }
    match &outcome.update {
        Some(pull) if pull.success => aggregator.append(&name, Category::Updated),
        Some(_) => aggregator.append(&name, Category::UpdateFailed),
        None => {}
    }
}
