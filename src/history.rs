//! History snapshot lookups and updates.
//!
//! The path arithmetic lives in [`source_cache_core::history`]; this module
//! adds the filesystem side: reading the modification time of a history
//! file, and refreshing history copies once a change has been reviewed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use filetime::FileTime;
use reqwest::Url;
use source_cache_core::history::history_path_for_file;
use source_cache_core::models::ChangedFile;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Modification time of the history copy of the file at `working_file_url`.
///
/// Returns `None` when the history file does not exist (never reviewed).
/// Any other failure, including an unparseable URL, is logged and also
/// reported as `None`.
pub async fn reviewed_timestamp(
    history_dir: &Path,
    working_file_url: &str,
) -> Option<DateTime<Utc>> {
    let working = match Url::parse(working_file_url)
        .ok()
        .and_then(|url| url.to_file_path().ok())
    {
        Some(path) => path,
        None => {
            warn!(url = working_file_url, "cannot map URL to a local path");
            return None;
        }
    };

    let history = history_path_for_file(history_dir, &working);
    match tokio::fs::metadata(&history).await {
        Ok(meta) => match meta.modified() {
            Ok(mtime) => Some(DateTime::<Utc>::from(mtime)),
            Err(e) => {
                warn!(path = %history.display(), error = %e, "history mtime unavailable");
                None
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %history.display(), error = %e, "failed to stat history file");
            None
        }
    }
}

/// Snapshot `working_file` into the history tree.
///
/// The file is copied to its mirrored location and the copy's modification
/// time is set to the working file's, so a later scan sees a tie and treats
/// the file as unchanged until it is modified again. Returns the history
/// path written.
pub async fn mark_reviewed(history_dir: &Path, working_file: &Path) -> Result<PathBuf> {
    let history = history_path_for_file(history_dir, working_file);
    if let Some(parent) = history.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create history directory: {}", parent.display()))?;
    }

    let mtime = tokio::fs::metadata(working_file)
        .await
        .and_then(|meta| meta.modified())
        .with_context(|| format!("Failed to stat {}", working_file.display()))?;

    // A previous read-only snapshot cannot be truncated in place.
    match tokio::fs::remove_file(&history).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to remove old snapshot {}", history.display())
            })
        }
    }

    tokio::fs::copy(working_file, &history)
        .await
        .with_context(|| {
            format!(
                "Failed to copy {} to {}",
                working_file.display(),
                history.display()
            )
        })?;

    let target = history.clone();
    tokio::task::spawn_blocking(move || {
        filetime::set_file_mtime(&target, FileTime::from_system_time(mtime))
    })
    .await?
    .with_context(|| format!("Failed to set mtime on {}", history.display()))?;

    debug!(file = %working_file.display(), history = %history.display(), "marked reviewed");
    Ok(history)
}

/// Snapshot every file of a directory scan rooted at `root`.
///
/// A file that cannot be snapshotted is logged and skipped. Returns the
/// number of files written to the history tree; fails only when there was
/// something to review and none of it could be written.
pub async fn mark_all_reviewed(
    history_dir: &Path,
    root: &Path,
    changes: &[ChangedFile],
) -> Result<usize> {
    let mut count = 0;
    let mut last_error = None;
    for change in changes {
        let working = root.join(&change.file);
        match mark_reviewed(history_dir, &working).await {
            Ok(_) => count += 1,
            Err(e) => {
                warn!(file = %working.display(), error = %e, "failed to mark reviewed");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if count == 0 => Err(e.context(format!(
            "No file under {} could be marked reviewed",
            root.display()
        ))),
        _ => Ok(count),
    }
}
