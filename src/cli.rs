//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::config::PostPath;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sitemap generator for blog-style sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root; the config file and relative paths resolve against it
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: sitemap.toml)
    #[arg(short = 'C', long, default_value = "sitemap.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides shared by every command that builds a sitemap
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Override base URL for the site.
    ///
    /// Useful for CI/CD deployments where the production URL differs from
    /// the one in sitemap.toml.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Post URL convention: `blog` or `blog/posts`
    #[arg(long = "post-path")]
    pub post_path: Option<PostPath>,

    /// Content directory of front-matter posts (relative to project root)
    #[arg(short, long, conflicts_with = "manifest")]
    pub content: Option<PathBuf>,

    /// JSON manifest of post records (relative to project root)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Seconds to wait for the content source
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate the sitemap and write it to the output file
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file path (relative to project root)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the document
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        indent: Option<bool>,
    },

    /// Generate the sitemap and print it to stdout
    Print {
        #[command(flatten)]
        source: SourceArgs,
    },
}

impl Cli {
    pub const fn is_print(&self) -> bool {
        matches!(self.command, Commands::Print { .. })
    }

    pub fn source(&self) -> &SourceArgs {
        match &self.command {
            Commands::Build { source, .. } | Commands::Print { source } => source,
        }
    }
}
