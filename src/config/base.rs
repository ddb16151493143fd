//! `[base]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in sitemap.toml - site identity.
///
/// # Example
/// ```toml
/// [base]
/// url = "https://example.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Base URL every `<loc>` is built from, without trailing slash.
    /// Trailing slashes are trimmed when the URL is used.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,
}

impl BaseConfig {
    /// Base URL with trailing slashes removed, or `None` if unset or blank.
    pub fn trimmed_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }
}
