//! `[sitemap]` section configuration.
//!
//! Static pages, the post URL convention and output settings.

use super::defaults;
use crate::error::SitemapError;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

// ============================================================================
// Enums
// ============================================================================

/// `<changefreq>` values defined by the sitemaps.org protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where post URLs live under the base URL.
///
/// Deployments differ here, so there is no default: it must be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostPath {
    /// `{base}/blog/{id}`
    #[serde(rename = "blog")]
    Blog,
    /// `{base}/blog/posts/{id}`
    #[serde(rename = "blog/posts")]
    BlogPosts,
}

impl PostPath {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::BlogPosts => "blog/posts",
        }
    }
}

impl FromStr for PostPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_matches('/') {
            "blog" => Ok(Self::Blog),
            "blog/posts" => Ok(Self::BlogPosts),
            other => Err(format!(
                "unknown post path `{other}`, expected `blog` or `blog/posts`"
            )),
        }
    }
}

// ============================================================================
// Static Pages
// ============================================================================

/// A fixed page listed ahead of all posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticPage {
    /// Path relative to the base URL; empty for the home page.
    #[serde(default)]
    pub path: String,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

impl StaticPage {
    pub fn new(path: impl Into<String>, changefreq: ChangeFreq, priority: f32) -> Self {
        Self {
            path: path.into(),
            changefreq,
            priority,
        }
    }

    /// Check the priority lies in `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), SitemapError> {
        if !(0.0..=1.0).contains(&self.priority) {
            return Err(SitemapError::config(format!(
                "[sitemap.pages] priority of `{}` must be between 0.0 and 1.0, got {}",
                self.path, self.priority
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Main SitemapConfig
// ============================================================================

/// `[sitemap]` section in sitemap.toml.
///
/// # Example
/// ```toml
/// [sitemap]
/// post_path = "blog/posts"
/// output = "dist/sitemap.xml"
///
/// [[sitemap.pages]]
/// path = ""
/// changefreq = "daily"
/// priority = 1.0
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Post URL convention; required.
    #[serde(default)]
    pub post_path: Option<PostPath>,

    /// Output file for `build`.
    #[serde(default = "defaults::sitemap::output")]
    #[educe(Default = defaults::sitemap::output())]
    pub output: PathBuf,

    /// Indent the document; `false` writes each element back to back.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub indent: bool,

    /// Static pages, in output order.
    #[serde(default = "defaults::sitemap::pages")]
    #[educe(Default = defaults::sitemap::pages())]
    pub pages: Vec<StaticPage>,
}
