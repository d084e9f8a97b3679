//! Deployment methods backed by a git remote.

use super::{
    DeploymentMethod, PublishError,
    context::PublishingContext,
    publisher::GitPublisher,
    remote::{github_remote, settings_url},
    source::PagesSource,
};
use crate::{
    log,
    utils::git::{GitCli, GitRunner},
};
use std::path::{Path, PathBuf};

/// Marker telling GitHub Pages not to run Jekyll over the site.
pub const NO_JEKYLL: &str = ".nojekyll";

/// Publish to GitHub Pages from `owner/repo`.
#[derive(Debug, Clone)]
pub struct GitHubPages<G = GitCli> {
    repository: String,
    source: PagesSource,
    use_ssh: bool,
    git: G,
}

impl GitHubPages {
    pub fn new(repository: impl Into<String>, source: PagesSource, use_ssh: bool) -> Self {
        Self {
            repository: repository.into(),
            source,
            use_ssh,
            git: GitCli::new(),
        }
    }
}

impl<G> GitHubPages<G> {
    /// Run git through `git` instead of the default CLI runner.
    pub fn with_runner<H: GitRunner>(self, git: H) -> GitHubPages<H> {
        GitHubPages {
            repository: self.repository,
            source: self.source,
            use_ssh: self.use_ssh,
            git,
        }
    }

    pub fn remote(&self) -> String {
        github_remote(&self.repository, self.use_ssh, true)
    }

    /// Reminder printed after a successful publish.
    pub fn advisory(&self) -> String {
        format!(
            "Remember to set your GitHub Pages source to \"{}\" at {}",
            self.source.target().label,
            settings_url(&self.repository)
        )
    }

    pub fn runner(&self) -> &G {
        &self.git
    }
}

impl<G: GitRunner> DeploymentMethod for GitHubPages<G> {
    fn name(&self) -> String {
        format!("GitHub Pages ({})", self.remote())
    }

    fn publish(&self, ctx: &dyn PublishingContext) -> Result<(), PublishError> {
        let target = self.source.target();
        let sentinel = ctx.create_output_file(Path::new(NO_JEKYLL))?;

        let subfolder = target.subfolder.map(PathBuf::from);
        let publisher = GitPublisher::new(self.remote(), target.branch, subfolder);
        let result = publisher.publish(ctx, &self.git);

        // The marker only belongs in the published tree
        let cleanup = sentinel.delete();
        if let (Err(_), Err(err)) = (&result, &cleanup) {
            log!("error"; "{err:#}");
        }
        result?;
        cleanup?;

        ctx.announce(&self.advisory());
        Ok(())
    }
}

/// Publish to a branch (and optional subfolder) of any git remote.
#[derive(Debug, Clone)]
pub struct GitRemote<G = GitCli> {
    remote: String,
    branch: String,
    subfolder: Option<PathBuf>,
    git: G,
}

impl GitRemote {
    pub fn new(
        remote: impl Into<String>,
        branch: impl Into<String>,
        subfolder: Option<PathBuf>,
    ) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
            subfolder,
            git: GitCli::new(),
        }
    }
}

impl<G> GitRemote<G> {
    pub fn with_runner<H: GitRunner>(self, git: H) -> GitRemote<H> {
        GitRemote {
            remote: self.remote,
            branch: self.branch,
            subfolder: self.subfolder,
            git,
        }
    }

    pub fn runner(&self) -> &G {
        &self.git
    }
}

impl<G: GitRunner> DeploymentMethod for GitRemote<G> {
    fn name(&self) -> String {
        format!("Git ({})", self.remote)
    }

    fn publish(&self, ctx: &dyn PublishingContext) -> Result<(), PublishError> {
        let subfolder = self.subfolder.clone();
        let publisher = GitPublisher::new(self.remote.clone(), self.branch.clone(), subfolder);
        publisher.publish(ctx, &self.git)?;
        Ok(())
    }
}
