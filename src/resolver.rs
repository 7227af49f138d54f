//! Source resolution.
//!
//! Turns a [`SourceDefinition`] into a [`CacheRecord`] by trying its
//! candidate URIs strictly in order (`work_url` first) and stopping at the
//! first one that succeeds.
//!
//! # Candidate handling
//!
//! | Scheme | Handling |
//! |--------|----------|
//! | `file` (regular file) | read full text, `updated_date` = file mtime |
//! | `file` (directory) | run the change scanner, `updated_date` = dir mtime |
//! | `file` (anything else) | candidate fails |
//! | any other scheme | HTTP GET, persist body under the cache dir, `updated_date` = now |
//! | no scheme | candidate fails |
//!
//! Candidate failures are logged and swallowed. When every candidate fails
//! [`Resolver::resolve_one`] returns `None`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Url;
use source_cache_core::models::{CacheRecord, SourceDefinition};
use source_cache_core::uri;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::CandidateError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::scanner;

/// Resolves sources against the filesystem and the network.
pub struct Resolver {
    fetcher: Arc<dyn Fetcher>,
    cache_dir: PathBuf,
    history_dir: PathBuf,
}

impl Resolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, cache_dir: PathBuf, history_dir: PathBuf) -> Self {
        Self {
            fetcher,
            cache_dir,
            history_dir,
        }
    }

    /// Resolver using [`HttpFetcher`] and the configured directories.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::new(
            Arc::new(fetcher),
            config.cache.dir.clone(),
            config.cache.history_dir.clone(),
        ))
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }

    /// Where a network candidate of `source_id` is persisted.
    pub fn cache_path(&self, source_id: &str) -> PathBuf {
        self.cache_dir.join(cache_file_name(source_id))
    }

    /// Try each candidate of `source` in order; first success wins.
    ///
    /// Returns `None` when every candidate failed.
    pub async fn resolve_one(&self, source: &SourceDefinition) -> Option<CacheRecord> {
        for candidate in source.candidates() {
            match self.try_candidate(source, candidate).await {
                Ok(record) => {
                    info!(
                        source = %source.id,
                        candidate,
                        kind = %record.kind(),
                        "resolved"
                    );
                    return Some(record);
                }
                Err(e) => {
                    warn!(source = %source.id, candidate, error = %e, "candidate failed");
                }
            }
        }

        warn!(
            source = %source.id,
            "no candidate could be resolved (expected for a directory source without a reachable file fallback)"
        );
        None
    }

    async fn try_candidate(
        &self,
        source: &SourceDefinition,
        candidate: &str,
    ) -> Result<CacheRecord, CandidateError> {
        match uri::scheme(candidate) {
            None => Err(CandidateError::InvalidUri(candidate.to_string())),
            Some(scheme) if scheme.eq_ignore_ascii_case("file") => {
                self.resolve_local(source, candidate).await
            }
            Some(_) => self.resolve_remote(source, candidate).await,
        }
    }

    async fn resolve_local(
        &self,
        source: &SourceDefinition,
        candidate: &str,
    ) -> Result<CacheRecord, CandidateError> {
        let url =
            Url::parse(candidate).map_err(|_| CandidateError::InvalidUri(candidate.to_string()))?;
        let path = url
            .to_file_path()
            .map_err(|_| CandidateError::NotLocalPath(candidate.to_string()))?;

        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| CandidateError::io(&path, e))?;
        let updated = mtime(&meta).map_err(|e| CandidateError::io(&path, e))?;

        if meta.is_file() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| CandidateError::io(&path, e))?;
            Ok(CacheRecord::file(&source.id, candidate, path, contents, updated))
        } else if meta.is_dir() {
            let changes = scanner::scan_changes(&path, &self.history_dir).await;
            debug!(source = %source.id, changed = changes.len(), "directory scanned");
            Ok(CacheRecord::directory(&source.id, candidate, path, changes, updated))
        } else {
            Err(CandidateError::NotFileOrDirectory(path))
        }
    }

    async fn resolve_remote(
        &self,
        source: &SourceDefinition,
        candidate: &str,
    ) -> Result<CacheRecord, CandidateError> {
        let body = self.fetcher.fetch_text(candidate).await?;

        let path = self.cache_path(&source.id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "removed stale cache file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CandidateError::io(&path, e)),
        }
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| CandidateError::io(&self.cache_dir, e))?;
        tokio::fs::write(&path, body.as_bytes())
            .await
            .map_err(|e| CandidateError::io(&path, e))?;

        Ok(CacheRecord::file(&source.id, candidate, path, body, Utc::now()))
    }
}

/// File name for a source's persisted network copy.
///
/// ASCII letters and digits are kept; every other character becomes `_`.
pub fn cache_file_name(source_id: &str) -> String {
    source_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn mtime(meta: &std::fs::Metadata) -> std::io::Result<DateTime<Utc>> {
    meta.modified().map(DateTime::<Utc>::from)
}
