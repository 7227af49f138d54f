//! Working-tree to history-tree path mapping.
//!
//! The history tree mirrors absolute working paths under a fixed root:
//! `/home/u/notes/a.md` maps to `<history_root>/home/u/notes/a.md`. Only
//! modification times of history files are ever consulted, never their
//! contents.

use std::path::{Component, Path, PathBuf};

/// Map a working directory path to its mirror under `history_root`.
///
/// Root and current-dir components are dropped so that an absolute working
/// path is appended to the history root instead of replacing it. `..` is
/// resolved lexically and clamped at the history root. A Windows
/// drive prefix becomes a plain directory (`C:` maps to `C`).
pub fn history_path_for(history_root: &Path, working_dir: &Path) -> PathBuf {
    let mut mirrored = history_root.to_path_buf();
    let mut depth = 0usize;
    for component in working_dir.components() {
        match component {
            Component::Normal(part) => {
                mirrored.push(part);
                depth += 1;
            }
            Component::Prefix(prefix) => {
                let raw = prefix.as_os_str().to_string_lossy();
                let cleaned: String = raw
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect();
                if !cleaned.is_empty() {
                    mirrored.push(cleaned);
                    depth += 1;
                }
            }
            // Never climb above `history_root`.
            Component::ParentDir => {
                if depth > 0 {
                    mirrored.pop();
                    depth -= 1;
                }
            }
            Component::RootDir | Component::CurDir => {}
        }
    }
    mirrored
}

/// Map a working file path to its mirror under `history_root`.
///
/// Splits the path into parent directory and file name, maps the parent
/// with [`history_path_for`], and appends the file name.
pub fn history_path_for_file(history_root: &Path, working_file: &Path) -> PathBuf {
    match (working_file.parent(), working_file.file_name()) {
        (Some(parent), Some(name)) => history_path_for(history_root, parent).join(name),
        _ => history_path_for(history_root, working_file),
    }
}
