//! Git access for deployments.
//!
//! Mutating operations go through the `git` executable behind the
//! [`GitRunner`] seam. Read-only inspection of a working tree uses `gix`.

use super::exec::{ExecError, GIT_FILTER, exec};
use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Runs one git invocation inside a working tree.
pub trait GitRunner {
    /// Run `git <args>` in `dir`, returning stdout.
    ///
    /// # Errors
    /// [`ExecError::Failed`] when git exits non-zero.
    fn git(&self, dir: &Path, args: &[&str]) -> Result<String, ExecError>;
}

/// Author and committer identity for deploy commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// [`GitRunner`] backed by the `git` executable on PATH.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    identity: Option<CommitIdentity>,
    pty: bool,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit as `identity` instead of the user's git configuration.
    pub fn with_identity(mut self, identity: Option<CommitIdentity>) -> Self {
        self.identity = identity;
        self
    }

    /// Push under a pseudo-terminal. Git then prints progress as it does in
    /// a terminal, but nothing is forwarded to it: credential prompts must be
    /// answered by a helper or an agent.
    pub fn pty(mut self, pty: bool) -> Self {
        self.pty = pty;
        self
    }

    fn command(&self) -> Vec<OsString> {
        let mut cmd = vec![OsString::from("git")];
        if let Some(identity) = &self.identity {
            cmd.extend([
                "-c".into(),
                format!("user.name={}", identity.name).into(),
                "-c".into(),
                format!("user.email={}", identity.email).into(),
            ]);
        }
        cmd
    }
}

impl GitRunner for GitCli {
    fn git(&self, dir: &Path, args: &[&str]) -> Result<String, ExecError> {
        let pty = self.pty && args.first() == Some(&"push");
        let args: Vec<OsString> = args.iter().map(OsString::from).collect();
        let output = exec(Some(dir), &self.command(), &args, &GIT_FILTER, pty)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Locate the `git` executable.
pub fn ensure_git_installed() -> Result<PathBuf> {
    which::which("git").context("`git` not found. Please install it first.")
}

/// Whether `refs/remotes/origin/<branch>` exists in the repository at `root`.
///
/// Meaningful after a fetch: tells a first publish apart from an update.
pub fn remote_branch_exists(root: &Path, branch: &str) -> Result<bool> {
    let repo = gix::open(root).with_context(|| format!("Failed to open {}", root.display()))?;
    let name = format!("refs/remotes/origin/{branch}");
    Ok(repo.find_reference(name.as_str()).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        ensure_git_installed().is_ok()
    }

    #[test]
    fn test_command_without_identity() {
        assert_eq!(GitCli::new().command(), [OsString::from("git")]);
    }

    #[test]
    fn test_command_with_identity() {
        let cli = GitCli::new().with_identity(Some(CommitIdentity {
            name: "Deploy Bot".into(),
            email: "bot@example.com".into(),
        }));
        let expected = [
            "git",
            "-c",
            "user.name=Deploy Bot",
            "-c",
            "user.email=bot@example.com",
        ];
        assert_eq!(cli.command(), expected.map(OsString::from));
    }

    #[test]
    fn test_remote_branch_exists() {
        if !git_available() {
            return;
        }
        let remote = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let git = GitCli::new().with_identity(Some(CommitIdentity {
            name: "test".into(),
            email: "test@example.com".into(),
        }));
        let run = |args: &[&str]| git.git(work.path(), args).unwrap();
        let remote_path = remote.path().to_str().unwrap();

        git.git(remote.path(), &["init", "--bare"]).unwrap();
        run(&["init"]);
        run(&["remote", "add", "origin", remote_path]);
        assert!(!remote_branch_exists(work.path(), "gh-pages").unwrap());

        run(&["checkout", "-b", "gh-pages"]);
        run(&["commit", "--allow-empty", "-m", "seed"]);
        run(&["push", "origin", "gh-pages"]);
        run(&["fetch"]);

        assert!(remote_branch_exists(work.path(), "gh-pages").unwrap());
        assert!(!remote_branch_exists(work.path(), "master").unwrap());
    }

    #[test]
    fn test_failed_git_reports_stderr() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let args = ["checkout", "no-such-branch"];
        let err = GitCli::new().git(dir.path(), &args).unwrap_err();
        match err {
            ExecError::Failed { name, message, .. } => {
                assert_eq!(name, "git");
                assert!(message.contains("not a git repository"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
