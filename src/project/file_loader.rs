//! Filesystem scan used when no live index answers.
//!
//! Walks the workspace root and keeps files with the document extension,
//! pruning hidden, build output and dependency directories. The returned
//! paths are canonical, sorted and deduplicated.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::error::{Result, WorkspaceError};
use crate::base::constants::{BUILD_DIRS, DEPENDENCY_DIRS};

/// Collects every document below `root` whose extension is `extension`.
///
/// `ignored` names extra directories to prune. Unreadable entries below the
/// root are skipped; an unreadable root is an error.
pub fn collect_file_paths(root: &Path, extension: &str, ignored: &[String]) -> Result<Vec<PathBuf>> {
    let root = std::fs::canonicalize(root).map_err(|e| WorkspaceError::io(root, e))?;
    if !root.is_dir() {
        return Err(WorkspaceError::Discovery(format!(
            "workspace root {} is not a directory",
            root.display()
        )));
    }

    let mut paths = Vec::new();
    let walker = WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_pruned(entry, ignored));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }
        match std::fs::canonicalize(entry.path()) {
            Ok(path) => paths.push(path),
            Err(e) => tracing::debug!(path = %entry.path().display(), error = %e, "skipping"),
        }
    }

    paths.sort();
    paths.dedup();
    tracing::debug!(root = %root.display(), count = paths.len(), "filesystem scan finished");
    Ok(paths)
}

/// True if `path` has the given extension (compared without the dot).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(OsStr::to_str) == Some(extension)
}

fn is_pruned(entry: &DirEntry, ignored: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    name.starts_with('.')
        || BUILD_DIRS.contains(&name)
        || DEPENDENCY_DIRS.contains(&name)
        || ignored.iter().any(|dir| dir == name)
}
