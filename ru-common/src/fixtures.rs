//! Test fixtures that build real git repositories.
//!
//! Shared by the crate's unit tests and the CLI integration tests. Helpers
//! panic on git failure: a fixture that cannot be built is a test
//! environment problem, not a condition under test.

use std::path::Path;
use std::process::Command;

/// Run a git command in `dir`, panicking on failure. Returns trimmed stdout.
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .unwrap_or_else(|err| panic!("failed to spawn git {args:?}: {err}"));
    assert!(
        output.status.success(),
        "git {:?} in {} failed: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Configure the throwaway committer identity used by fixture commits.
pub fn set_identity(path: &Path) {
    run_git(path, &["config", "user.name", "fixture"]);
    run_git(path, &["config", "user.email", "fixture@example.com"]);
}

/// Create a repository at `path`, on `branch`, with one initial commit.
pub fn init_repo(path: &Path, branch: &str) {
    std::fs::create_dir_all(path).expect("create repository directory");
    run_git(path, &["init"]);
    run_git(path, &["symbolic-ref", "HEAD", &format!("refs/heads/{branch}")]);
    set_identity(path);
    std::fs::write(path.join("README.md"), "fixture\n").expect("write README");
    run_git(path, &["add", "."]);
    run_git(path, &["commit", "-m", "initial"]);
}

/// Add an empty commit to an existing repository.
pub fn commit(path: &Path, message: &str) {
    run_git(path, &["commit", "--allow-empty", "-m", message]);
}

/// Clone `upstream` to `dest` with tracking configured for `branch`.
pub fn clone_repo(upstream: &Path, dest: &Path, branch: &str) {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).expect("create clone parent");
    }
    let output = Command::new("git")
        .arg("clone")
        .arg("--branch")
        .arg(branch)
        .arg(upstream)
        .arg(dest)
        .output()
        .unwrap_or_else(|err| panic!("failed to spawn git clone: {err}"));
    assert!(
        output.status.success(),
        "git clone {} -> {} failed: {}",
        upstream.display(),
        dest.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    set_identity(dest);
}
