//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }
}

// ============================================================================
// [sitemap] Section Defaults
// ============================================================================

pub mod sitemap {
    use super::super::{ChangeFreq, StaticPage};
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        "public/sitemap.xml".into()
    }

    /// Home page and blog index.
    pub fn pages() -> Vec<StaticPage> {
        vec![
            StaticPage::new("", ChangeFreq::Daily, 1.0),
            StaticPage::new("blog", ChangeFreq::Daily, 0.8),
        ]
    }
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        "src/content/blog".into()
    }

    /// Seconds to wait for the content source.
    pub fn timeout() -> u64 {
        30
    }
}
