//! Core data models used throughout Source Cache.
//!
//! [`SourceDefinition`]s come from configuration and are read-only to the
//! cache. [`CacheRecord`]s are built by the resolver and replaced wholesale
//! on each successful refresh; they are never mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A logical source with a preferred location and ranked fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Stable, globally unique, URI-shaped identifier.
    pub id: String,
    /// Preferred location. Always tried before any entry in `urls`.
    pub work_url: String,
    /// Additional candidate locations, tried in order after `work_url`.
    #[serde(default)]
    pub urls: Vec<SourceUrl>,
}

/// An additional candidate location for a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUrl {
    pub url: String,
    /// Sync method hint (e.g. `"http"`, `"git"`). Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<String>,
}

impl SourceUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            sync: None,
        }
    }
}

impl SourceDefinition {
    pub fn new(id: impl Into<String>, work_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            work_url: work_url.into(),
            urls: Vec::new(),
        }
    }

    /// Builder-style helper to append a fallback candidate.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(SourceUrl::new(url));
        self
    }

    /// Candidate URIs in resolution order: `work_url` first, then `urls`.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.work_url.as_str()).chain(self.urls.iter().map(|u| u.url.as_str()))
    }
}

/// A file whose on-disk modification time is newer than its history copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path relative to the source root, `/`-separated, no leading separator.
    pub file: String,
    /// Current on-disk modification time.
    pub mtime: DateTime<Utc>,
}

/// Whether a [`CacheRecord`] was built from a single file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    File,
    Directory,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::File => f.pad("file"),
            RecordKind::Directory => f.pad("directory"),
        }
    }
}

/// The resolved state of a source after a successful refresh.
///
/// Exactly one of `contents` (single file or fetched document) or
/// `file_cache` (directory) is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheRecord {
    pub source_id: String,
    /// The candidate URI that succeeded.
    pub source_url: String,
    /// Resolved local path, or the persisted copy for network candidates.
    pub local_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    pub file_cache: Vec<ChangedFile>,
    /// When the underlying data was last verified.
    pub updated_date: DateTime<Utc>,
}

impl CacheRecord {
    /// Record for a single file or a fetched document.
    pub fn file(
        source_id: impl Into<String>,
        source_url: impl Into<String>,
        local_file: impl Into<PathBuf>,
        contents: String,
        updated_date: DateTime<Utc>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_url: source_url.into(),
            local_file: local_file.into(),
            contents: Some(contents),
            file_cache: Vec::new(),
            updated_date,
        }
    }

    /// Record for a directory, carrying its change list.
    pub fn directory(
        source_id: impl Into<String>,
        source_url: impl Into<String>,
        local_file: impl Into<PathBuf>,
        file_cache: Vec<ChangedFile>,
        updated_date: DateTime<Utc>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_url: source_url.into(),
            local_file: local_file.into(),
            contents: None,
            file_cache,
            updated_date,
        }
    }

    pub fn kind(&self) -> RecordKind {
        if self.contents.is_some() {
            RecordKind::File
        } else {
            RecordKind::Directory
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind() == RecordKind::Directory
    }
}
