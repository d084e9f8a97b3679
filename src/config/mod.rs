//! Configuration management for `ghpages.toml`.
//!
//! # Sections
//!
//! | Section             | Purpose                                  |
//! |---------------------|------------------------------------------|
//! | `[site]`            | Where the rendered site lives            |
//! | `[deploy]`          | Provider, scratch directory, push mode   |
//! | `[deploy.github]`   | GitHub repository and Pages source       |
//! | `[deploy.git]`      | Plain git remote, branch and subfolder   |
//! | `[deploy.commit]`   | Optional identity for deploy commits     |
//!
//! # Example
//!
//! ```toml
//! [site]
//! output = "public"
//!
//! [deploy.github]
//! repository = "alice/alice.github.io"
//! source = "master"
//! ```

pub mod defaults;
mod deploy;
mod error;
mod site;

pub use deploy::{CommitConfig, DeployConfig, GitDeployConfig, GithubDeployConfig};
pub use error::ConfigError;
pub use site::SiteSection;

use crate::{
    cli::{Cli, Commands, TargetArgs},
    log,
};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing ghpages.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub deploy: DeployConfig,
}

impl PublishConfig {
    /// Parse configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: PublishConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Apply CLI overrides and resolve every path against the project root.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = Self::normalize_path(cli.root.as_deref().unwrap_or(Path::new("./")));
        Self::update_option(&mut self.site.output, cli.output.as_ref());

        match &cli.command {
            Commands::Deploy { target, pty } => {
                self.update_target(target);
                if *pty {
                    self.deploy.pty = true;
                }
            }
            Commands::Settings { target } => self.update_target(target),
        }

        self.site.output = Self::resolve(&root, &self.site.output);
        self.deploy.workdir = Self::resolve(&root, &self.deploy.workdir);
    }

    fn update_target(&mut self, target: &TargetArgs) {
        let github = &mut self.deploy.github;
        Self::update_option(&mut github.repository, target.repository.as_ref());
        Self::update_option(&mut github.source, target.source.as_ref());
        if target.https {
            github.ssh = false;
        }
        // Naming a repository on the command line means GitHub Pages
        if target.repository.is_some() {
            self.deploy.provider = defaults::deploy::provider();
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Expand `~` and make `path` absolute relative to `root`.
    fn resolve(root: &Path, path: &Path) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
        if expanded.is_relative() {
            Self::normalize_path(&root.join(expanded))
        } else {
            Self::normalize_path(&expanded)
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the given command
    pub fn validate(&self, command: &Commands) -> Result<()> {
        let deploy = &self.deploy;

        match deploy.provider.as_str() {
            "github" => {
                let repository = deploy.github.repository.trim();
                if repository.is_empty() {
                    bail!(ConfigError::Validation(
                        "[deploy.github.repository] is required".into()
                    ));
                }
                if !repository.contains('/') {
                    log!("config"; "repository `{repository}` does not look like `owner/repo`");
                }
            }
            "git" => {
                if matches!(command, Commands::Settings { .. }) {
                    bail!("`settings` only applies to the github provider");
                }
                if deploy.git.remote.trim().is_empty() {
                    bail!(ConfigError::Validation(
                        "[deploy.git.remote] is required".into()
                    ));
                }
                if deploy.git.branch.trim().is_empty() {
                    bail!(ConfigError::Validation(
                        "[deploy.git.branch] must not be empty".into()
                    ));
                }
            }
            other => bail!(ConfigError::Validation(format!(
                "[deploy.provider] `{other}` is not supported, use \"github\" or \"git\""
            ))),
        }

        if let Commands::Deploy { .. } = command
            && !self.site.output.is_dir()
        {
            bail!(ConfigError::Validation(format!(
                "[site.output] `{}` not found, build the site first",
                self.site.output.display()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
