//! Per-document publication cache.
//!
//! One JSON record per source document, stored sibling to the document at
//! the document path with its extension replaced by `blogpost`
//! (`article.txt` -> `article.blogpost`). The record is private to this
//! tool; it is not a stable interchange format.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use blogpost_wordpress::PostKind;

use crate::error::PublishError;

/// Extension of the cache file placed next to the source document.
const CACHE_EXTENSION: &str = "blogpost";

/// Publication status of a document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Visible on the blog.
    Published,
    /// Draft, not publicly visible.
    #[default]
    Unpublished,
}

impl Status {
    #[must_use]
    pub fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Unpublished => "unpublished",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload state of one referenced media file.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// SHA-256 hex of the file content at last upload.
    pub checksum: String,
    /// Remote URL; `None` until the first successful upload.
    #[serde(default)]
    pub url: Option<String>,
}

/// Publication state of one source document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheRecord {
    /// Server-assigned id; `None` until the first successful publish, then
    /// stable for the document's lifetime.
    pub post_id: Option<String>,
    /// Last published title.
    pub title: String,
    /// Last requested publication status.
    pub status: Status,
    /// Post or page.
    pub kind: PostKind,
    /// Creation time, seconds since epoch UTC.
    pub created_at: i64,
    /// Last update time, seconds since epoch UTC.
    pub updated_at: i64,
    /// Permalink assigned by the server.
    pub url: Option<String>,
    /// SHA-256 hex of the last-published source document.
    pub checksum: Option<String>,
    /// Relative media path -> upload state.
    pub media: BTreeMap<String, MediaRecord>,
}

/// Cache file path for a source document.
#[must_use]
pub fn cache_path(document: &Path) -> PathBuf {
    document.with_extension(CACHE_EXTENSION)
}

impl CacheRecord {
    /// Load the record for `document`, failing if no cache file exists.
    pub fn load(document: &Path) -> Result<Self, PublishError> {
        let path = cache_path(document);
        if !path.exists() {
            return Err(PublishError::MissingCache(path));
        }
        Self::read(&path)
    }

    /// Load the record for `document`, or an empty record if none exists.
    /// The boolean reports whether a cache file was found.
    pub fn load_or_default(document: &Path) -> Result<(Self, bool), PublishError> {
        let path = cache_path(document);
        if path.exists() {
            Ok((Self::read(&path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    fn read(path: &Path) -> Result<Self, PublishError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| PublishError::CacheFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Persist the record next to `document`.
    pub fn store(&self, document: &Path) -> Result<(), PublishError> {
        let path = cache_path(document);
        tracing::debug!("writing cache file {}", path.display());

        let content = serde_json::to_string_pretty(self).map_err(|source| {
            PublishError::CacheFormat {
                path: path.clone(),
                source,
            }
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Remove the cache file for `document`, failing if none exists.
    pub fn remove(document: &Path) -> Result<(), PublishError> {
        let path = cache_path(document);
        if !path.exists() {
            return Err(PublishError::MissingCache(path));
        }
        std::fs::remove_file(&path)?;
        Ok(())
    }

    /// Remove the cache file for `document` if present.
    pub fn remove_if_exists(document: &Path) -> Result<(), PublishError> {
        let path = cache_path(document);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// SHA-256 content hash as lowercase hex.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
