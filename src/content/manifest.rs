//! Post records from a JSON manifest.
//!
//! ```json
//! [
//!   { "id": "hello", "date": "2024-01-01T00:00:00Z" },
//!   { "id": "wip", "draft": true }
//! ]
//! ```

use super::{ContentSource, PostRecord};
use crate::{error::DataSourceError, utils::date::parse_date};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Manifest entry as written on disk.
///
/// `id` and `date` are kept untyped so a malformed draft still loads.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    date: Option<serde_json::Value>,
    #[serde(default)]
    draft: bool,
}

/// Reads every record from one JSON file, in array order.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for ManifestSource {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, DataSourceError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_manifest(&path)).await?
    }
}

fn read_manifest(path: &Path) -> Result<Vec<PostRecord>, DataSourceError> {
    let content = fs::read_to_string(path)
        .map_err(|err| DataSourceError::Unreachable(path.to_path_buf(), err))?;
    let entries: Vec<ManifestEntry> = serde_json::from_str(&content)
        .map_err(|err| DataSourceError::Manifest(path.to_path_buf(), err))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| to_record(path, index, entry))
        .collect()
}

fn to_record(path: &Path, index: usize, entry: ManifestEntry) -> Result<PostRecord, DataSourceError> {
    let id = entry
        .id
        .as_ref()
        .and_then(|id| id.as_str())
        .map(|id| id.trim_matches('/').to_owned());

    if entry.draft {
        return Ok(PostRecord::draft(id.unwrap_or_default()));
    }

    let invalid = |message: &str| {
        DataSourceError::ManifestEntry(path.to_path_buf(), format!("entry {index}: {message}"))
    };
    let id = match (entry.id, id) {
        (None | Some(serde_json::Value::Null), _) => return Err(invalid("missing `id`")),
        (_, None) => return Err(invalid("`id` must be a string")),
        (_, Some(id)) if id.is_empty() => return Err(invalid("`id` is empty")),
        (_, Some(id)) => id,
    };

    let published = match entry.date {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => match parse_date(&s) {
            Some(dt) => Some(dt),
            None => return Err(DataSourceError::InvalidDate { id, value: s }),
        },
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
        draft: false,
    })
}
