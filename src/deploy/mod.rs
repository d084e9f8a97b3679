//! Site deployment.
//!
//! A [`DeploymentMethod`] takes the rendered site through a
//! [`PublishingContext`] and publishes it. Both methods here publish through
//! git: [`GitHubPages`] for a GitHub repository and [`GitRemote`] for any
//! other remote.

pub mod context;
mod error;
pub mod github;
pub mod publisher;
pub mod remote;
pub mod source;
pub mod sync;

#[cfg(test)]
mod e2e;
#[cfg(test)]
pub(crate) mod testing;

pub use context::{DeploymentFolder, PublishingContext, SiteContext};
pub use error::PublishError;
pub use github::{GitHubPages, GitRemote};
pub use publisher::{GitPublisher, Stage};
pub use source::PagesSource;

use crate::{
    config::PublishConfig,
    log,
    utils::git::{GitCli, ensure_git_installed},
};
use anyhow::{Result, bail};

/// One way of publishing a built site.
pub trait DeploymentMethod {
    /// Human readable description, including the destination.
    fn name(&self) -> String;

    /// Publish the site reachable through `ctx`.
    fn publish(&self, ctx: &dyn PublishingContext) -> Result<(), PublishError>;
}

/// Build the deployment method configured in `[deploy]`.
pub fn method_from_config(config: &PublishConfig) -> Result<Box<dyn DeploymentMethod>> {
    let deploy = &config.deploy;
    let git = GitCli::new()
        .with_identity(deploy.commit.as_ref().map(|c| c.identity()))
        .pty(deploy.pty);

    let method: Box<dyn DeploymentMethod> = match deploy.provider.as_str() {
        "github" => {
            let github = &deploy.github;
            let pages = GitHubPages::new(&github.repository, github.source, github.ssh);
            Box::new(pages.with_runner(git))
        }
        "git" => {
            let target = &deploy.git;
            let subfolder = target.subfolder.clone();
            let remote = GitRemote::new(&target.remote, &target.branch, subfolder);
            Box::new(remote.with_runner(git))
        }
        other => bail!("Deploy provider `{other}` is not supported"),
    };
    Ok(method)
}

/// Publish the built site with the configured deployment method.
pub fn deploy_site(config: &PublishConfig) -> Result<()> {
    ensure_git_installed()?;
    let method = method_from_config(config)?;
    let ctx = SiteContext::new(&config.site.output, &config.deploy.workdir);

    log!("deploy"; "publishing {} via {}", config.site.output.display(), method.name());
    method.publish(&ctx)?;
    log!("deploy"; "done");
    Ok(())
}
