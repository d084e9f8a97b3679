//! Publish a generated static site to GitHub Pages.
//!
//! The site is committed to a branch (or a `/docs` folder of a branch) of a
//! git remote from an ephemeral working tree, on top of the branch's existing
//! history, and pushed without force.

pub mod cli;
pub mod config;
pub mod deploy;
pub mod utils;
