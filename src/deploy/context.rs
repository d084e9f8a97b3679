//! Publishing context: what a deployment method may touch.
//!
//! A method never reaches into the project directly. It asks the context
//! for a deployment folder (already holding the rendered site) and for
//! files inside the site output.

use super::PublishError;
use crate::{log, utils::fs as fsx};
use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Hook run on a freshly emptied deployment folder, before the site is copied in.
pub type PrepareFolder<'a> = dyn FnMut(&DeploymentFolder) -> Result<(), PublishError> + 'a;

/// Capabilities the build pipeline hands to a deployment method.
pub trait PublishingContext {
    /// Create the deployment folder `<Prefix>Deploy`.
    ///
    /// The folder is emptied (hidden entries included), `prepare` runs on it,
    /// then the rendered site is copied into its site root: the folder itself,
    /// or `subfolder` inside it.
    fn create_deployment_folder(
        &self,
        prefix: &str,
        subfolder: Option<&Path>,
        prepare: &mut PrepareFolder<'_>,
    ) -> Result<DeploymentFolder, PublishError>;

    /// Create an empty file at `relative` inside the site output. A file the
    /// build already wrote there is kept as is.
    fn create_output_file(&self, relative: &Path) -> Result<OutputFile>;

    /// Show a line to the operator.
    fn announce(&self, line: &str);
}

/// Ephemeral git working tree for one publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentFolder {
    root: PathBuf,
    site_root: PathBuf,
}

impl DeploymentFolder {
    /// # Errors
    /// When `subfolder` is absolute or escapes the folder.
    pub fn new(root: PathBuf, subfolder: Option<&Path>) -> Result<Self> {
        let site_root = match subfolder {
            Some(sub) => {
                check_subfolder(sub)?;
                root.join(sub)
            }
            None => root.clone(),
        };
        Ok(Self { root, site_root })
    }

    /// Repository root, where git runs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the rendered site lands.
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    pub fn has_subfolder(&self) -> bool {
        self.site_root != self.root
    }
}

fn check_subfolder(sub: &Path) -> Result<()> {
    let mut normal = 0;
    for component in sub.components() {
        match component {
            Component::Normal(name) if name == ".git" => {
                bail!("Subfolder `{}` points into git metadata", sub.display())
            }
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            _ => bail!(
                "Subfolder `{}` must stay inside the deployment folder",
                sub.display()
            ),
        }
    }
    if normal == 0 {
        bail!("Subfolder `{}` is empty", sub.display());
    }
    Ok(())
}

/// A file placed inside the site output, removed again with [`OutputFile::delete`].
///
/// A file the build already produced is left untouched and survives `delete`.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    created: bool,
}

impl OutputFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file was created for this publish.
    pub fn created(&self) -> bool {
        self.created
    }

    pub fn delete(self) -> Result<()> {
        if !self.created {
            return Ok(());
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to delete {}", self.path.display()))
    }
}

/// Context over a project on disk.
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Rendered site produced by the build.
    output: PathBuf,
    /// Scratch directory holding deployment folders.
    workdir: PathBuf,
}

impl SiteContext {
    pub fn new(output: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            workdir: workdir.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn deployment_path(&self, prefix: &str) -> PathBuf {
        self.workdir.join(format!("{prefix}Deploy"))
    }
}

impl PublishingContext for SiteContext {
    fn create_deployment_folder(
        &self,
        prefix: &str,
        subfolder: Option<&Path>,
        prepare: &mut PrepareFolder<'_>,
    ) -> Result<DeploymentFolder, PublishError> {
        let folder = DeploymentFolder::new(self.deployment_path(prefix), subfolder)?;
        fsx::empty_dir(folder.root())?;

        prepare(&folder)?;

        // A checked out branch may carry an older copy of the site in the subfolder
        if folder.has_subfolder() {
            fsx::empty_dir(folder.site_root())?;
        }
        let copied = fsx::copy_dir_contents(&self.output, folder.site_root())?;
        log!("deploy"; "copied {copied} files into {}", folder.site_root().display());

        Ok(folder)
    }

    fn create_output_file(&self, relative: &Path) -> Result<OutputFile> {
        let path = self.output.join(relative);
        if path.exists() {
            log!("deploy"; "keeping {} from the build", path.display());
            return Ok(OutputFile {
                path,
                created: false,
            });
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(OutputFile {
            path,
            created: true,
        })
    }

    fn announce(&self, line: &str) {
        println!("{line}");
    }
}
