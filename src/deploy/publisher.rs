//! The git publish protocol.
//!
//! ```text
//! Preparing -> RemoteConfigured -> Synced -> Committed -> Pushed
//! ```
//!
//! Each step is one or more git invocations in a deployment folder owned by
//! this publish alone. The first failing step ends the publish: nothing is
//! retried or rolled back.

use super::{
    PublishError,
    context::{DeploymentFolder, PublishingContext},
    sync::strategy_for,
};
use crate::{log, utils::date::deploy_stamp, utils::git::GitRunner};
use std::{
    cell::Cell,
    fmt,
    path::{Path, PathBuf},
};

/// Name prefix of the deployment folder (`GitDeploy`).
pub const FOLDER_PREFIX: &str = "Git";

/// Progress of a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Deployment folder emptied, repository not yet initialized.
    Preparing,
    /// `git init` done and `origin` added.
    RemoteConfigured,
    /// Fetched and attached to the target branch.
    Synced,
    /// Deploy commit recorded locally.
    Committed,
    /// Branch pushed to `origin`.
    Pushed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preparing => "preparing",
            Self::RemoteConfigured => "remote configured",
            Self::Synced => "synced",
            Self::Committed => "committed",
            Self::Pushed => "pushed",
        };
        f.write_str(name)
    }
}

/// Publishes a deployment folder to one branch of a git remote.
#[derive(Debug)]
pub struct GitPublisher {
    remote: String,
    branch: String,
    subfolder: Option<PathBuf>,
    stage: Cell<Stage>,
}

impl GitPublisher {
    pub fn new(
        remote: impl Into<String>,
        branch: impl Into<String>,
        subfolder: Option<PathBuf>,
    ) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
            subfolder,
            stage: Cell::new(Stage::Preparing),
        }
    }

    pub fn subfolder(&self) -> Option<&Path> {
        self.subfolder.as_deref()
    }

    /// Last stage reached. After a failure, the step that failed is the next one.
    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    /// Run the whole protocol, stamping the commit with the current local time.
    pub fn publish(
        &self,
        ctx: &dyn PublishingContext,
        git: &dyn GitRunner,
    ) -> Result<DeploymentFolder, PublishError> {
        self.publish_at(ctx, git, &deploy_stamp())
    }

    /// Run the whole protocol with an explicit `yyyy-MM-dd HH:mm` stamp.
    pub fn publish_at(
        &self,
        ctx: &dyn PublishingContext,
        git: &dyn GitRunner,
        stamp: &str,
    ) -> Result<DeploymentFolder, PublishError> {
        let sync = strategy_for(self.subfolder());
        self.advance(Stage::Preparing);

        let folder = ctx.create_deployment_folder(FOLDER_PREFIX, self.subfolder(), &mut |folder| {
            let root = folder.root();
            git.git(root, &["init"])?;
            git.git(root, &["remote", "add", "origin", &self.remote])?;
            self.advance(Stage::RemoteConfigured);

            git.git(root, &["fetch"])?;
            sync.sync(git, root, &self.branch)?;
            self.advance(Stage::Synced);
            Ok(())
        })?;

        let root = folder.root();
        let message = format!("Publish deploy {stamp}");
        git.git(root, &["add", "."])?;
        git.git(root, &["commit", "-a", "-m", &message, "--allow-empty"])?;
        self.advance(Stage::Committed);

        sync.finalize(git, root, &self.branch)?;

        log!("git"; "pushing `{}` to {}", self.branch, self.remote);
        git.git(root, &["push", "origin", &self.branch])?;
        self.advance(Stage::Pushed);

        Ok(folder)
    }

    fn advance(&self, stage: Stage) {
        self.stage.set(stage);
        log!("deploy"; "{stage}");
    }
}
