//! Repository discovery.
//!
//! Walks the directory tree beneath a root, yielding every directory that
//! directly contains a `.git` subdirectory. The walk never descends beneath
//! a discovered repository root, and per-entry traversal errors (permission
//! denied, broken symlinks) are logged and skipped rather than aborting the
//! remainder of the walk.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A version-controlled repository discovered beneath the sweep root.
///
/// Immutable after discovery; owned exclusively by the evaluation unit that
/// processes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Filesystem path of the repository root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short display name: the final path component.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Lazy, single-pass iterator over repository roots beneath a directory.
pub struct RepoWalk {
    inner: walkdir::IntoIter,
}

impl RepoWalk {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: WalkDir::new(root).into_iter(),
        }
    }
}

impl Iterator for RepoWalk {
    type Item = Repository;

    fn next(&mut self) -> Option<Repository> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "skipping unreadable entry during discovery");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            // The marker must be a directory: submodule and worktree
            // checkouts carry a `.git` gitlink file and are not swept
            // independently.
            if entry.path().join(".git").is_dir() {
                let repo = Repository::new(entry.path());
                self.inner.skip_current_dir();
                return Some(repo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn mark_repo(path: &Path) {
        fs::create_dir_all(path.join(".git")).unwrap();
    }

    fn discovered_names(root: &Path) -> Vec<String> {
        let mut names: Vec<String> = RepoWalk::new(root).map(|r| r.name()).collect();
        names.sort();
        names
    }

    #[test]
    fn finds_repositories_at_any_depth() {
        let dir = tempfile::tempdir().unwrap();
        mark_repo(&dir.path().join("alpha"));
        mark_repo(&dir.path().join("group/beta"));
        fs::create_dir_all(dir.path().join("group/plain")).unwrap();

        assert_eq!(discovered_names(dir.path()), ["alpha", "beta"]);
    }

    #[test]
    fn does_not_descend_into_discovered_repositories() {
        let dir = tempfile::tempdir().unwrap();
        mark_repo(&dir.path().join("outer"));
        mark_repo(&dir.path().join("outer/vendored/inner"));

        assert_eq!(discovered_names(dir.path()), ["outer"]);
    }

    #[test]
    fn ignores_gitlink_files() {
        let dir = tempfile::tempdir().unwrap();
        let submodule = dir.path().join("submodule");
        fs::create_dir_all(&submodule).unwrap();
        fs::write(submodule.join(".git"), "gitdir: ../.git/modules/submodule").unwrap();

        assert!(discovered_names(dir.path()).is_empty());
    }

    #[test]
    fn root_itself_can_be_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        mark_repo(dir.path());
        mark_repo(&dir.path().join("nested"));

        let repos: Vec<Repository> = RepoWalk::new(dir.path()).collect();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].path(), dir.path());
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discovered_names(dir.path()).is_empty());
    }
}
