//! End-to-end publishes against a local bare remote with the real `git`.
//!
//! Skipped when `git` is not on PATH.

use super::{DeploymentMethod, GitRemote, SiteContext};
use crate::utils::git::{CommitIdentity, GitCli, GitRunner, ensure_git_installed};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    remote: PathBuf,
    scratch: PathBuf,
    ctx: SiteContext,
}

fn git() -> GitCli {
    GitCli::new().with_identity(Some(CommitIdentity {
        name: "ghpages test".into(),
        email: "test@example.com".into(),
    }))
}

fn fixture() -> Option<Fixture> {
    ensure_git_installed().ok()?;

    let dir = TempDir::new().unwrap();
    let remote = dir.path().join("remote.git");
    let scratch = dir.path().join("scratch");
    let output = dir.path().join("public");
    fs::create_dir_all(&remote).unwrap();
    fs::create_dir_all(&scratch).unwrap();
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("index.html"), "v1").unwrap();

    git().git(&remote, &["init", "--bare"]).unwrap();
    let ctx = SiteContext::new(output, dir.path().join(".deploy"));
    Some(Fixture {
        _dir: dir,
        remote,
        scratch,
        ctx,
    })
}

impl Fixture {
    fn method(&self, branch: &str, subfolder: Option<&str>) -> GitRemote<GitCli> {
        let remote = self.remote.to_str().unwrap();
        let subfolder = subfolder.map(PathBuf::from);
        GitRemote::new(remote, branch, subfolder).with_runner(git())
    }

    /// Push a commit holding `README.md` to `branch` of the remote.
    fn seed(&self, branch: &str) {
        let git = git();
        let dir = &self.scratch;
        let remote = self.remote.to_str().unwrap();
        git.git(dir, &["init"]).unwrap();
        git.git(dir, &["remote", "add", "origin", remote]).unwrap();
        git.git(dir, &["checkout", "-b", branch]).unwrap();
        fs::write(dir.join("README.md"), "source notes").unwrap();
        git.git(dir, &["add", "."]).unwrap();
        git.git(dir, &["commit", "-m", "seed"]).unwrap();
        git.git(dir, &["push", "origin", branch]).unwrap();
    }

    fn deployed(&self) -> PathBuf {
        self.ctx.deployment_path("Git")
    }
}

/// Commit summaries of `branch` in the remote, newest first, following first parents.
fn history(remote: &Path, branch: &str) -> Vec<String> {
    let repo = gix::open(remote).unwrap();
    let name = format!("refs/heads/{branch}");
    let reference = repo.find_reference(name.as_str()).unwrap();

    let mut next = Some(reference.target().id().to_owned());
    let mut summaries = Vec::new();
    while let Some(id) = next {
        let commit = repo.find_commit(id).unwrap();
        summaries.push(commit.message().unwrap().summary().to_string());
        next = commit.parent_ids().next().map(|parent| parent.detach());
    }
    summaries
}

#[test]
fn test_root_branch_first_and_repeated_publish() {
    let Some(fx) = fixture() else { return };
    let method = fx.method("gh-pages", None);

    method.publish(&fx.ctx).unwrap();
    let first = history(&fx.remote, "gh-pages");
    assert_eq!(first.len(), 1);
    assert!(first[0].starts_with("Publish deploy "));

    // Second publish builds on the pushed history instead of replacing it
    fs::write(fx.ctx.output().join("index.html"), "v2").unwrap();
    method.publish(&fx.ctx).unwrap();
    let second = history(&fx.remote, "gh-pages");
    assert_eq!(second.len(), 2);
    assert!(second.iter().all(|s| s.starts_with("Publish deploy ")));
    let index = fs::read_to_string(fx.deployed().join("index.html")).unwrap();
    assert_eq!(index, "v2");
}

#[test]
fn test_root_branch_replaces_existing_content() {
    let Some(fx) = fixture() else { return };
    fx.seed("master");

    fx.method("master", None).publish(&fx.ctx).unwrap();

    assert_eq!(history(&fx.remote, "master").len(), 2);
    assert!(fx.deployed().join("index.html").exists());
    // the deploy commit holds only the site
    assert!(!fx.deployed().join("README.md").exists());
}

#[test]
fn test_subfolder_keeps_rest_of_branch() {
    let Some(fx) = fixture() else { return };
    fx.seed("master");
    let method = fx.method("master", Some("docs"));

    method.publish(&fx.ctx).unwrap();
    method.publish(&fx.ctx).unwrap();

    let summaries = history(&fx.remote, "master");
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[2], "seed");
    assert!(fx.deployed().join("README.md").exists());
    assert!(fx.deployed().join("docs/index.html").exists());
    assert!(!fx.deployed().join("index.html").exists());
}

#[test]
fn test_subfolder_creates_missing_branch() {
    let Some(fx) = fixture() else { return };
    let method = fx.method("master", Some("docs"));

    method.publish(&fx.ctx).unwrap();
    // branch exists now, the plain checkout succeeds
    method.publish(&fx.ctx).unwrap();

    assert_eq!(history(&fx.remote, "master").len(), 2);
}

#[test]
fn test_unreachable_remote_reports_git_message() {
    let Some(fx) = fixture() else { return };
    let missing = fx.remote.join("missing.git");
    let method = GitRemote::new(missing.to_str().unwrap(), "gh-pages", None);
    let method = method.with_runner(git());

    let err = method.publish(&fx.ctx).unwrap_err();

    assert!(matches!(err, super::PublishError::Command(_)));
    assert!(!err.to_string().starts_with("Command `git` failed"));
    assert!(!err.to_string().is_empty());
}
