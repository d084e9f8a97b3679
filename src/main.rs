//! ghpages - publish a built site to GitHub Pages.

use anyhow::Result;
use clap::Parser;
use ghpages::{
    cli::{Cli, Commands},
    config::PublishConfig,
    deploy::{GitHubPages, deploy_site},
    log,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Deploy { .. } => deploy_site(&config),
        Commands::Settings { .. } => {
            let github = &config.deploy.github;
            let pages = GitHubPages::new(&github.repository, github.source, github.ssh);
            println!("{}", pages.advisory());
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<PublishConfig> {
    let root = cli.root.as_deref().unwrap_or(std::path::Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        PublishConfig::from_path(&config_path)?
    } else {
        log!("config"; "{} not found, using defaults", config_path.display());
        PublishConfig::default()
    };
    config.update_with_cli(cli);
    config.validate(&cli.command)?;

    Ok(config)
}
