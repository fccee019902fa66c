use std::path::Path;
use std::process::Command;

use crate::error::{PrStatusError, Result};
use crate::exec::{run_with_timeout, BRANCH_TIMEOUT};

/// Branch name git reports for a detached HEAD. Callers treat it the same
/// as having no branch at all.
pub const DETACHED_HEAD: &str = "HEAD";

/// Check if the given directory is inside a git repository
pub fn is_git_repo(dir: &Path) -> bool {
    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "--git-dir"]).current_dir(dir);

    run_with_timeout(cmd, BRANCH_TIMEOUT)
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get the current branch name for the given directory
///
/// Returns the sentinel `"HEAD"` when the repository is in a detached-head
/// state.
pub fn current_branch(dir: &Path) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "--abbrev-ref", "HEAD"]).current_dir(dir);

    let output = run_with_timeout(cmd, BRANCH_TIMEOUT)
        .ok_or_else(|| PrStatusError::GitError("git did not respond".to_string()))?;

    if !output.status.success() {
        return Err(PrStatusError::GitError(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if branch.is_empty() {
        return Err(PrStatusError::GitError("empty branch name".to_string()));
    }

    Ok(branch)
}

/// Get the current branch name, or `None` on any failure
///
/// The silent counterpart of [`current_branch`] for callers that must never
/// see an error. The detached-head sentinel passes through unchanged.
pub fn resolve_branch(dir: &Path) -> Option<String> {
    current_branch(dir).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_git_repo_false_outside_repo() {
        let dir = tempdir().unwrap();
        assert!(!is_git_repo(dir.path()));
    }

    #[test]
    fn test_current_branch_fails_outside_repo() {
        let dir = tempdir().unwrap();
        assert!(current_branch(dir.path()).is_err());
    }

    #[test]
    fn test_resolve_branch_absent_outside_repo() {
        let dir = tempdir().unwrap();
        assert!(resolve_branch(dir.path()).is_none());
    }

    #[test]
    fn test_detached_head_sentinel_value() {
        // The sentinel must match what `git rev-parse --abbrev-ref HEAD`
        // prints for a detached head.
        assert_eq!(DETACHED_HEAD, "HEAD");
    }
}
