//! Directory change scanner.
//!
//! Walks a source directory and reports every regular file whose current
//! modification time is newer than the modification time of its mirror in
//! the history tree. Files without a history mirror are always reported.
//!
//! # Entry policy
//!
//! | Entry | Handling |
//! |-------|----------|
//! | Regular file | compared against its history mirror |
//! | Directory | descended into |
//! | Symlink, device, socket, ... | skipped |
//! | Unreadable entry | skipped with a warning, siblings still scanned |
//!
//! Modification-time ties count as unchanged. The order of the returned
//! list is not significant.

use chrono::{DateTime, Utc};
use source_cache_core::history::history_path_for;
use source_cache_core::models::ChangedFile;
use std::io::ErrorKind;
use std::path::{Component, Path};
use std::time::SystemTime;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Scan `root` against its mirror under `history_dir`.
///
/// Runs on the blocking thread pool so a slow filesystem does not stall
/// other tasks. Never fails: unreadable entries are skipped and a failed
/// background task yields an empty list.
pub async fn scan_changes(root: &Path, history_dir: &Path) -> Vec<ChangedFile> {
    let root = root.to_path_buf();
    let history_root = history_path_for(history_dir, &root);
    match tokio::task::spawn_blocking(move || scan_tree(&root, &history_root)).await {
        Ok(changes) => changes,
        Err(e) => {
            warn!(error = %e, "directory scan task failed");
            Vec::new()
        }
    }
}

/// Blocking scan of `root`, comparing each file with the same relative
/// path under `history_root`.
pub fn scan_tree(root: &Path, history_root: &Path) -> Vec<ChangedFile> {
    let mut changes = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = ?e.path(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            trace!(path = %entry.path().display(), "skipping non-regular entry");
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };

        let current = match entry
            .metadata()
            .map_err(std::io::Error::from)
            .and_then(|m| m.modified())
        {
            Ok(mtime) => mtime,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping file without mtime");
                continue;
            }
        };

        let reviewed = history_mtime(&history_root.join(relative));
        if is_changed(current, reviewed) {
            changes.push(ChangedFile {
                file: normalize_relative(relative),
                mtime: DateTime::<Utc>::from(current),
            });
        }
    }

    debug!(root = %root.display(), changed = changes.len(), "scan complete");
    changes
}

/// A file is changed when it has no history mirror or is strictly newer.
fn is_changed(current: SystemTime, reviewed: Option<SystemTime>) -> bool {
    match reviewed {
        Some(reviewed) => current > reviewed,
        None => true,
    }
}

fn history_mtime(path: &Path) -> Option<SystemTime> {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => Some(mtime),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to stat history file");
            None
        }
    }
}

/// Join path components with `/`, without a leading separator.
fn normalize_relative(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
