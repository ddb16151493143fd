//! Output document generators.

pub mod sitemap;

pub use sitemap::{CONTENT_TYPE, Sitemap, UrlEntry, build_sitemap, write_sitemap};
