//! Reconciling a fresh deployment repository with the remote branch.
//!
//! Both strategies run after `git fetch` and leave the next commit on top of
//! the remote's existing history when the branch exists, so the final push
//! fast-forwards instead of needing `--force`.

use super::PublishError;
use crate::{
    log,
    utils::{
        exec::ExecError,
        git::{GitRunner, remote_branch_exists},
    },
};
use std::path::Path;

/// How the working tree is attached to the target branch.
pub trait SyncStrategy {
    /// Runs after fetch, before the site is copied in.
    fn sync(&self, git: &dyn GitRunner, root: &Path, branch: &str) -> Result<(), PublishError>;

    /// Runs after the deploy commit, before pushing.
    fn finalize(&self, git: &dyn GitRunner, root: &Path, branch: &str) -> Result<(), PublishError>;
}

/// Publishing into a subfolder: the rest of the branch must survive.
///
/// Checks out the branch so its content is in the working tree, creating it
/// when it does not exist yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubfolderSync;

impl SyncStrategy for SubfolderSync {
    fn sync(&self, git: &dyn GitRunner, root: &Path, branch: &str) -> Result<(), PublishError> {
        match git.git(root, &["checkout", branch]) {
            Ok(_) => Ok(()),
            Err(ExecError::Failed { .. }) => {
                log!("git"; "branch `{branch}` not found, creating it");
                git.git(root, &["checkout", "-b", branch])?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn finalize(
        &self,
        _git: &dyn GitRunner,
        _root: &Path,
        _branch: &str,
    ) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Publishing the whole branch: its content is replaced by the site.
///
/// `HEAD` points at the fetched remote ref, so the deploy commit takes the
/// remote tip as parent (or becomes a root commit on a first publish). The
/// local branch is only created from that commit in [`SyncStrategy::finalize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RootBranchSync;

impl SyncStrategy for RootBranchSync {
    fn sync(&self, git: &dyn GitRunner, root: &Path, branch: &str) -> Result<(), PublishError> {
        match remote_branch_exists(root, branch) {
            Ok(true) => log!("git"; "updating existing branch `{branch}`"),
            Ok(false) => log!("git"; "first publish to branch `{branch}`"),
            Err(err) => log!("git"; "could not inspect remote refs: {err:#}"),
        }
        let remote_ref = format!("refs/remotes/origin/{branch}");
        git.git(root, &["symbolic-ref", "HEAD", &remote_ref])?;
        Ok(())
    }

    fn finalize(&self, git: &dyn GitRunner, root: &Path, branch: &str) -> Result<(), PublishError> {
        git.git(root, &["checkout", "-b", branch])?;
        Ok(())
    }
}

/// Strategy for a publish with or without an output subfolder.
pub fn strategy_for(subfolder: Option<&Path>) -> &'static dyn SyncStrategy {
    if subfolder.is_some() {
        &SubfolderSync
    } else {
        &RootBranchSync
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::testing::RecordingGit;

    const MISSING: &str = "error: pathspec 'master' did not match any file(s) known to git";

    #[test]
    fn test_subfolder_sync_existing_branch() {
        let git = RecordingGit::new();
        SubfolderSync.sync(&git, Path::new("/w"), "master").unwrap();
        assert_eq!(git.commands(), ["checkout master"]);
    }

    #[test]
    fn test_subfolder_sync_falls_back_to_new_branch() {
        let git = RecordingGit::new().fail_on("checkout master", MISSING);
        SubfolderSync.sync(&git, Path::new("/w"), "master").unwrap();
        assert_eq!(git.commands(), ["checkout master", "checkout -b master"]);
    }

    #[test]
    fn test_subfolder_sync_fallback_failure_surfaces_second_error() {
        let git = RecordingGit::new()
            .fail_on("checkout master", "first")
            .fail_on("checkout -b master", "fatal: cannot create branch");
        let root = Path::new("/w");
        let err = SubfolderSync.sync(&git, root, "master").unwrap_err();
        assert_eq!(err.to_string(), "fatal: cannot create branch");
    }

    #[test]
    fn test_subfolder_sync_does_not_hide_spawn_errors() {
        let git = RecordingGit::new().spawn_error_on("checkout master");
        let root = Path::new("/w");
        let err = SubfolderSync.sync(&git, root, "master").unwrap_err();
        assert!(matches!(err, PublishError::Other(_)));
        assert_eq!(git.commands(), ["checkout master"]);
    }

    #[test]
    fn test_subfolder_finalize_is_noop() {
        let git = RecordingGit::new();
        let root = Path::new("/w");
        SubfolderSync.finalize(&git, root, "master").unwrap();
        assert!(git.commands().is_empty());
    }

    #[test]
    fn test_root_branch_sync_points_head_at_remote() {
        let git = RecordingGit::new();
        let root = Path::new("/w");
        let head = "symbolic-ref HEAD refs/remotes/origin/gh-pages";

        RootBranchSync.sync(&git, root, "gh-pages").unwrap();
        assert_eq!(git.commands(), [head]);

        RootBranchSync.finalize(&git, root, "gh-pages").unwrap();
        assert_eq!(git.commands(), [head, "checkout -b gh-pages"]);
    }

    #[test]
    fn test_root_branch_sync_outside_a_repository() {
        // No repository to inspect: the lookup is only logged
        let dir = tempfile::TempDir::new().unwrap();
        let git = RecordingGit::new();
        RootBranchSync.sync(&git, dir.path(), "gh-pages").unwrap();
        assert_eq!(git.commands().len(), 1);
    }

    #[test]
    fn test_strategy_for() {
        let git = RecordingGit::new();
        let root = Path::new("/w");
        let docs = strategy_for(Some(Path::new("docs")));
        docs.sync(&git, root, "master").unwrap();
        strategy_for(None).sync(&git, root, "master").unwrap();
        assert_eq!(
            git.commands(),
            [
                "checkout master",
                "symbolic-ref HEAD refs/remotes/origin/master",
            ]
        );
    }
}
