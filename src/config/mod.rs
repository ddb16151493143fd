//! Site configuration management for `sitemap.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[base]`    | Site base URL                                    |
//! | `[sitemap]` | Static pages, post URL convention, output file   |
//! | `[content]` | Where post records are read from                 |
//!
//! # Example
//!
//! ```toml
//! [base]
//! url = "https://example.com"
//!
//! [sitemap]
//! post_path = "blog"
//!
//! [content]
//! dir = "src/content/blog"
//! ```

mod base;
mod content;
pub mod defaults;
mod sitemap;

pub use base::BaseConfig;
pub use content::{ContentConfig, ContentLocation};
pub use sitemap::{ChangeFreq, PostPath, SitemapConfig, StaticPage};

use crate::{
    cli::{Cli, Commands},
    error::SitemapError,
};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing sitemap.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site identity
    #[serde(default)]
    pub base: BaseConfig,

    /// Sitemap layout and output
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Post record source
    #[serde(default)]
    pub content: ContentConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, SitemapError> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, SitemapError> {
        let content =
            fs::read_to_string(path).map_err(|err| SitemapError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config file named by the CLI, falling back to defaults when
    /// it does not exist, then apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self, SitemapError> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        Ok(config)
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> Result<&str, SitemapError> {
        self.base
            .trimmed_url()
            .ok_or_else(|| SitemapError::config("[base.url] is required"))
    }

    /// The post URL convention chosen for this deployment.
    pub fn post_path(&self) -> Result<PostPath, SitemapError> {
        self.sitemap.post_path.ok_or_else(|| {
            SitemapError::config(r#"[sitemap.post_path] must be set to "blog" or "blog/posts""#)
        })
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let source = cli.source();

        if let Some(url) = &source.base_url {
            self.base.url = Some(url.clone());
        }
        if let Some(post_path) = source.post_path {
            self.sitemap.post_path = Some(post_path);
        }
        Self::update_option(&mut self.content.timeout, source.timeout.as_ref());

        if let Some(dir) = &source.content {
            self.content.dir = Some(dir.clone());
            self.content.manifest = None;
        }
        if let Some(manifest) = &source.manifest {
            self.content.manifest = Some(manifest.clone());
            self.content.dir = None;
        }

        if let Commands::Build { output, indent, .. } = &cli.command {
            Self::update_option(&mut self.sitemap.output, output.as_ref());
            Self::update_option(&mut self.sitemap.indent, indent.as_ref());
        }

        let root = Self::normalize_path(cli.root.as_deref().unwrap_or(Path::new("./")));
        self.update_path_with_root(&root, &cli.config);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve all paths against the root directory
    fn update_path_with_root(&mut self, root: &Path, config: &Path) {
        self.config_path = Self::normalize_path(&root.join(config));
        self.sitemap.output = Self::normalize_path(&root.join(&self.sitemap.output));

        if let Some(manifest) = &self.content.manifest {
            self.content.manifest = Some(Self::normalize_path(&root.join(manifest)));
        }
        // The default directory is relative to the root too
        let dir = match self.content.dir.take() {
            None if self.content.manifest.is_none() => Some(defaults::content::dir()),
            dir => dir,
        };
        self.content.dir = dir.map(|dir| Self::normalize_path(&root.join(dir)));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before any content is read
    pub fn validate(&self) -> Result<(), SitemapError> {
        let base_url = self.base_url()?;
        if !base_url.starts_with("http") {
            return Err(SitemapError::config(
                "[base.url] must start with http:// or https://",
            ));
        }

        self.post_path()?;

        for page in &self.sitemap.pages {
            page.validate()?;
        }

        if self.content.dir.is_some() && self.content.manifest.is_some() {
            return Err(SitemapError::config(
                "[content.dir] and [content.manifest] are mutually exclusive",
            ));
        }
        if self.content.timeout == 0 {
            return Err(SitemapError::config(
                "[content.timeout] must be at least 1 second",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
