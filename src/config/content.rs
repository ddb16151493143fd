//! `[content]` section configuration.
//!
//! Selects where post records come from.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// `[content]` section in sitemap.toml.
///
/// # Example
/// ```toml
/// [content]
/// dir = "src/content/blog"
/// timeout = 30
/// ```
///
/// `manifest = "posts.json"` reads a JSON manifest instead of scanning `dir`.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory of front-matter posts.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// JSON manifest of post records.
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Seconds to wait for the content source before failing.
    #[serde(default = "defaults::content::timeout")]
    #[educe(Default = defaults::content::timeout())]
    pub timeout: u64,
}

/// Resolved location of post records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    Dir(PathBuf),
    Manifest(PathBuf),
}

impl ContentConfig {
    /// The configured location; a content directory when nothing is set.
    ///
    /// Both `dir` and `manifest` being set is rejected by validation.
    pub fn location(&self) -> ContentLocation {
        match (&self.dir, &self.manifest) {
            (_, Some(manifest)) => ContentLocation::Manifest(manifest.clone()),
            (Some(dir), None) => ContentLocation::Dir(dir.clone()),
            (None, None) => ContentLocation::Dir(defaults::content::dir()),
        }
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
