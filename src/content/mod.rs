//! Post record sources.
//!
//! The sitemap builder never reaches for content on its own: it is handed a
//! [`ContentSource`] and awaits a single [`ContentSource::list_posts`] call.
//!
//! # Sources
//!
//! | Source             | Reads                                          |
//! |--------------------|------------------------------------------------|
//! | [`DirSource`]      | `*.md` / `*.mdx` files with `+++` front matter |
//! | [`ManifestSource`] | a JSON array of `{ id, date, draft }`          |
//! | [`MemorySource`]   | records supplied by the caller                 |

mod dir;
mod manifest;

pub use dir::DirSource;
pub use manifest::ManifestSource;

use crate::error::DataSourceError;
use chrono::{DateTime, Utc};

/// One discovered post.
///
/// `published` is optional so that drafts with a missing or unreadable date
/// can still be listed and then skipped; a published post without it is
/// rejected by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// URL-safe slug, appended to the post path.
    pub id: String,
    pub published: Option<DateTime<Utc>>,
    pub draft: bool,
}

impl PostRecord {
    pub fn new(id: impl Into<String>, published: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            published: Some(published),
            draft: false,
        }
    }

    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            published: None,
            draft: true,
        }
    }
}

/// Anything that can list every post record in one batch.
pub trait ContentSource {
    fn list_posts(&self) -> impl Future<Output = Result<Vec<PostRecord>, DataSourceError>> + Send;
}

/// Records held in memory, returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    posts: Vec<PostRecord>,
}

impl MemorySource {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        Self { posts }
    }
}

impl ContentSource for MemorySource {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, DataSourceError> {
        Ok(self.posts.clone())
    }
}

/// Derive a post id from a path relative to the content root.
///
/// `posts/hello.md` -> `posts/hello`, `hello/index.md` -> `hello`.
fn id_from_relative(relative: &std::path::Path) -> String {
    let stem = relative.with_extension("");
    let mut parts: Vec<String> = stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.len() > 1 && parts.last().is_some_and(|last| last == "index") {
        parts.pop();
    }
    parts.join("/")
}
