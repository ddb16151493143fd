//! blog-sitemap - sitemaps.org documents for blog-style sites.
//!
//! ```text
//! SiteConfig ──┐
//!              ├──► build_sitemap() ──► XML string ──► write_sitemap() / stdout
//! ContentSource┘        │
//!                       └── list_posts() (one awaited fetch, drafts dropped)
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod utils;

pub use config::SiteConfig;
pub use content::{ContentSource, DirSource, ManifestSource, MemorySource, PostRecord};
pub use error::{DataSourceError, SitemapError};
pub use generator::{CONTENT_TYPE, build_sitemap};
