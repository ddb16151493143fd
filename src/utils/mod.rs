//! Utility modules for the sitemap generator.

pub mod date;
pub mod log;
