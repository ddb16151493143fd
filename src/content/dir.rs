//! Front-matter posts on disk.
//!
//! ```text
//! +++
//! title = "Hello"
//! date = 2024-01-01T00:00:00Z
//! draft = false
//! slug = "hello-world"   # optional id override
//! +++
//!
//! Post body...
//! ```
//!
//! Only `date`, `draft` and `slug` are read; other keys are ignored.

use super::{ContentSource, PostRecord, id_from_relative};
use crate::{error::DataSourceError, utils::date::parse_date};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// File extensions treated as posts.
const POST_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

/// Front matter delimiter line.
const DELIMITER: &str = "+++";

/// Scans a directory tree for posts, in file-name order.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ContentSource for DirSource {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, DataSourceError> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || scan_dir(&dir)).await?
    }
}

fn scan_dir(dir: &Path) -> Result<Vec<PostRecord>, DataSourceError> {
    if !dir.is_dir() {
        return Err(DataSourceError::Unreachable(
            dir.to_path_buf(),
            io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| DataSourceError::Unreachable(dir.to_path_buf(), err.into()))?;
        if !entry.file_type().is_file() || !is_post_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let content = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::InvalidData => {
                DataSourceError::FrontMatter(path.to_path_buf(), "file is not valid UTF-8".into())
            }
            _ => DataSourceError::Unreachable(path.to_path_buf(), err),
        })?;
        let relative = path.strip_prefix(dir).unwrap_or(path);
        posts.push(parse_post(path, &id_from_relative(relative), &content)?);
    }
    Ok(posts)
}

#[inline]
fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| POST_EXTENSIONS.contains(&ext))
}

/// Extract the text between the opening and closing `+++` lines.
fn split_front_matter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = rest.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

/// Build a record from one post file.
///
/// The draft flag is read first; a draft's slug and date are never inspected.
fn parse_post(path: &Path, default_id: &str, content: &str) -> Result<PostRecord, DataSourceError> {
    let invalid = |msg: &str| DataSourceError::FrontMatter(path.to_path_buf(), msg.to_owned());

    let front = split_front_matter(content).ok_or_else(|| invalid("missing `+++` front matter"))?;
    let table: toml::Table = toml::from_str(front).map_err(|err| invalid(err.message()))?;

    let draft = match table.get("draft") {
        None => false,
        Some(toml::Value::Boolean(draft)) => *draft,
        Some(_) => return Err(invalid("`draft` must be a boolean")),
    };

    // Drafts are dropped by the builder; nothing past the flag is checked
    if draft {
        return Ok(PostRecord::draft(default_id));
    }

    let id = match table.get("slug") {
        Some(toml::Value::String(slug)) => slug.trim_matches('/').to_owned(),
        Some(_) => return Err(invalid("`slug` must be a string")),
        None => default_id.to_owned(),
    };
    if id.is_empty() {
        return Err(invalid("post id is empty"));
    }

    let published = match table.get("date") {
        None => None,
        Some(toml::Value::Datetime(dt)) => Some(parse_or_invalid(&id, &dt.to_string())?),
        Some(toml::Value::String(s)) => Some(parse_or_invalid(&id, s)?),
        Some(other) => {
            return Err(DataSourceError::InvalidDate {
                id,
                value: other.to_string(),
            });
        }
    };

    Ok(PostRecord {
        id,
        published,
        draft,
    })
}

fn parse_or_invalid(id: &str, value: &str) -> Result<chrono::DateTime<chrono::Utc>, DataSourceError> {
    parse_date(value).ok_or_else(|| DataSourceError::InvalidDate {
        id: id.to_owned(),
        value: value.to_owned(),
    })
}
