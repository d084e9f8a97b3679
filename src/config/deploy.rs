//! `[deploy]` section configuration.
//!
//! Selects the deployment method and its destination.

use super::defaults;
use crate::{deploy::PagesSource, utils::git::CommitIdentity};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[deploy]` section in ghpages.toml.
///
/// # Example
/// ```toml
/// [deploy]
/// provider = "github"
///
/// [deploy.github]
/// repository = "alice/site"
/// source = "gh-pages"
/// ssh = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Deployment provider: "github" or "git".
    #[serde(default = "defaults::deploy::provider")]
    #[educe(Default = defaults::deploy::provider())]
    pub provider: String,

    /// Scratch directory for deployment folders (relative to the project root).
    #[serde(default = "defaults::deploy::workdir")]
    #[educe(Default = defaults::deploy::workdir())]
    pub workdir: PathBuf,

    /// Push under a pseudo-terminal, so git reports progress as in a terminal.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub pty: bool,

    /// GitHub Pages settings.
    #[serde(default)]
    pub github: GithubDeployConfig,

    /// Plain git remote settings.
    #[serde(default)]
    pub git: GitDeployConfig,

    /// Identity for deploy commits. Falls back to the user's git config.
    #[serde(default)]
    pub commit: Option<CommitConfig>,
}

/// `[deploy.github]` section - GitHub Pages.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct GithubDeployConfig {
    /// Full repository name, `owner/repo`.
    #[serde(default = "defaults::deploy::github::repository")]
    #[educe(Default = defaults::deploy::github::repository())]
    pub repository: String,

    /// Publishing source selected in the repository settings.
    #[serde(default)]
    pub source: PagesSource,

    /// Use an SSH remote instead of HTTPS.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub ssh: bool,
}

/// `[deploy.git]` section - any git remote.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct GitDeployConfig {
    /// Remote URL passed to `git remote add`.
    #[serde(default = "defaults::deploy::git::remote")]
    #[educe(Default = defaults::deploy::git::remote())]
    pub remote: String,

    /// Branch receiving the site.
    #[serde(default = "defaults::deploy::git::branch")]
    #[educe(Default = defaults::deploy::git::branch())]
    pub branch: String,

    /// Publish into this folder of the branch, keeping the rest of it.
    #[serde(default)]
    pub subfolder: Option<PathBuf>,
}

/// `[deploy.commit]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitConfig {
    pub name: String,
    pub email: String,
}

impl CommitConfig {
    pub fn identity(&self) -> CommitIdentity {
        CommitIdentity {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}
