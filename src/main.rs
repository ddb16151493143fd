//! blog-sitemap - generate a sitemap.xml for a blog.

use anyhow::Result;
use blog_sitemap::{
    DirSource, ManifestSource, SiteConfig,
    cli::{Cli, Commands},
    config::ContentLocation,
    generator::{build_sitemap, write_sitemap},
    log,
    utils::log::route_to_stderr,
};
use clap::Parser;
use std::io::{Write, stdout};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.is_print() {
        route_to_stderr();
    }

    run(&cli).await
}

async fn run(cli: &Cli) -> Result<()> {
    let config = SiteConfig::load(cli)?;
    let xml = generate(&config).await?;

    match &cli.command {
        Commands::Build { .. } => write_sitemap(&config, &xml),
        Commands::Print { .. } => {
            let mut out = stdout().lock();
            out.write_all(xml.as_bytes())?;
            out.flush()?;
            Ok(())
        }
    }
}

/// Build the document from whichever content source is configured.
async fn generate(config: &SiteConfig) -> Result<String> {
    let xml = match config.content.location() {
        ContentLocation::Dir(dir) => {
            log!("content"; "scanning {}", dir.display());
            build_sitemap(config, &DirSource::new(dir)).await?
        }
        ContentLocation::Manifest(path) => {
            log!("content"; "reading {}", path.display());
            build_sitemap(config, &ManifestSource::new(path)).await?
        }
    };
    Ok(xml)
}
