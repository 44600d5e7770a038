//! Categorized sweep outcomes.
//!
//! The aggregator is the only shared mutable state in a run. Every in-flight
//! evaluation unit appends into it through a single lock-guarded operation,
//! and the categorized sequences become readable only once the engine has
//! joined every unit and consumes the collector into an [`AggregateReport`].

use serde::Serialize;
use std::sync::Mutex;

/// Outcome category a repository display name is recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NotOnBranch,
    UncommittedChanges,
    UnpushedCommits,
    NoRemoteUpdates,
    Updated,
    UpdateFailed,
}

/// Final categorized listing of repository names.
///
/// Insertion order within each sequence follows completion order of the
/// concurrent units and varies across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    /// Failed the branch check.
    pub not_on_branch: Vec<String>,
    /// Failed the working-tree cleanliness check.
    pub uncommitted_changes: Vec<String>,
    /// Failed the outgoing-commits check.
    pub unpushed_commits: Vec<String>,
    /// Nothing to pull; skipped, not a failure.
    pub no_remote_updates: Vec<String>,
    /// All checks passed and the pull succeeded.
    pub updated: Vec<String>,
    /// All checks passed but the pull failed.
    pub update_failed: Vec<String>,
}

impl AggregateReport {
    /// Total number of entries across all sequences.
    pub fn len(&self) -> usize {
        self.not_on_branch.len()
            + self.uncommitted_changes.len()
            + self.unpushed_commits.len()
            + self.no_remote_updates.len()
            + self.updated.len()
            + self.update_failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sequence_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::NotOnBranch => &mut self.not_on_branch,
            Category::UncommittedChanges => &mut self.uncommitted_changes,
            Category::UnpushedCommits => &mut self.unpushed_commits,
            Category::NoRemoteUpdates => &mut self.no_remote_updates,
            Category::Updated => &mut self.updated,
            Category::UpdateFailed => &mut self.update_failed,
        }
    }
}

/// Mutation-guarded collector the concurrent evaluation units append into.
#[derive(Debug, Default)]
pub struct Aggregator {
    inner: Mutex<AggregateReport>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one repository under one category.
    pub fn append(&self, name: &str, category: Category) {
        let mut report = self.inner.lock().expect("aggregator lock poisoned");
        report.sequence_mut(category).push(name.to_string());
    }

    /// Consume the collector once every evaluation unit has completed.
    pub fn into_report(self) -> AggregateReport {
        self.inner.into_inner().expect("aggregator lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn append_routes_to_the_right_sequence() {
        let aggregator = Aggregator::new();
        aggregator.append("a", Category::NotOnBranch);
        aggregator.append("b", Category::UncommittedChanges);
        aggregator.append("c", Category::UnpushedCommits);
        aggregator.append("d", Category::NoRemoteUpdates);
        aggregator.append("e", Category::Updated);
        aggregator.append("f", Category::UpdateFailed);

        let report = aggregator.into_report();
        assert_eq!(report.not_on_branch, ["a"]);
        assert_eq!(report.uncommitted_changes, ["b"]);
        assert_eq!(report.unpushed_commits, ["c"]);
        assert_eq!(report.no_remote_updates, ["d"]);
        assert_eq!(report.updated, ["e"]);
        assert_eq!(report.update_failed, ["f"]);
        assert_eq!(report.len(), 6);
    }

    #[test]
    fn one_name_may_appear_in_several_categories() {
        let aggregator = Aggregator::new();
        aggregator.append("repo", Category::NotOnBranch);
        aggregator.append("repo", Category::UncommittedChanges);

        let report = aggregator.into_report();
        assert_eq!(report.not_on_branch, ["repo"]);
        assert_eq!(report.uncommitted_changes, ["repo"]);
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        let aggregator = Arc::new(Aggregator::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let aggregator = Arc::clone(&aggregator);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        aggregator.append(&format!("r{worker}-{i}"), Category::Updated);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let report = Arc::try_unwrap(aggregator).unwrap().into_report();
        assert_eq!(report.updated.len(), 800);
    }

    #[test]
    fn serializes_every_category_key_even_when_empty() {
        let report = AggregateReport::default();
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "not_on_branch",
            "uncommitted_changes",
            "unpushed_commits",
            "no_remote_updates",
            "updated",
            "update_failed",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
