//! Error types.
//!
//! Every failure is fatal to a single sitemap build. Errors fall into two
//! families: configuration problems detected before any content is read, and
//! data-source problems raised while fetching or interpreting post records.

use std::{io, path::PathBuf, time::Duration};
use thiserror::Error;

/// Top-level error for loading configuration and building a sitemap.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Configuration(String),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}

/// Errors raised by a content source or by records it returned.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("content source `{0}` is unreachable")]
    Unreachable(PathBuf, #[source] io::Error),

    #[error("post `{0}` has no publication date")]
    MissingDate(String),

    #[error("post `{id}` has an invalid date `{value}`")]
    InvalidDate { id: String, value: String },

    #[error("invalid front matter in `{0}`: {1}")]
    FrontMatter(PathBuf, String),

    #[error("invalid post manifest `{0}`")]
    Manifest(PathBuf, #[source] serde_json::Error),

    #[error("invalid entry in post manifest `{0}`: {1}")]
    ManifestEntry(PathBuf, String),

    #[error("content source did not respond within {0:?}")]
    Timeout(Duration),

    #[error("content scan was aborted")]
    Aborted(#[from] tokio::task::JoinError),
}

impl SitemapError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
