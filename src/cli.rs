//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::deploy::PagesSource;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Publish a generated site to GitHub Pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Rendered site directory (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: ghpages.toml)
    #[arg(short = 'C', long, default_value = "ghpages.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the `[deploy.github]` section
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// GitHub repository, `owner/repo`
    #[arg(short, long)]
    pub repository: Option<String>,

    /// GitHub Pages source configured for the repository
    #[arg(short, long, value_enum)]
    pub source: Option<PagesSource>,

    /// Use an HTTPS remote instead of SSH
    #[arg(long)]
    pub https: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Commit the rendered site to the Pages branch and push it
    Deploy {
        #[command(flatten)]
        target: TargetArgs,

        /// Push under a pseudo-terminal to get git's progress output
        #[arg(long)]
        pty: bool,
    },

    /// Print where to set the GitHub Pages source, without publishing
    Settings {
        #[command(flatten)]
        target: TargetArgs,
    },
}
