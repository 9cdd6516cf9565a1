//! Entry-file location for extracted project bundles.
//!
//! Uploaded bundles have arbitrary internal layouts (`index.html` at the
//! root, under `dist/`, under some nested app folder, or missing entirely).
//! [`find_entry_file`] walks the tree and returns the first entry file in a
//! deterministic order so the computed preview path does not depend on
//! platform directory-listing order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Canonical entry filename a browser should load for an uploaded project.
pub const ENTRY_FILE_NAME: &str = "index.html";

/// Maximum directory depth for entry and asset searches.
///
/// Uploaded archives can be arbitrarily nested; the bound keeps a
/// pathological bundle from turning a walk into an unbounded scan.
pub const MAX_SEARCH_DEPTH: usize = 16;

/// Directories excluded from every recursive search: dependency-manager
/// trees and hidden (dot-prefixed) directories.
pub fn is_skipped_dir(name: &str) -> bool {
    name == "node_modules" || name.starts_with('.')
}

/// Find the entry file under `root`, returning its path relative to `root`.
///
/// Search order:
/// 1. `index.html` directly in `root` wins over any nested match.
/// 2. Otherwise immediate subdirectories are visited in lexicographic
///    order (skipping [`is_skipped_dir`] names) and the first subtree that
///    yields a match wins. No exhaustive "best match" search.
/// 3. `None` if nothing matched anywhere.
///
/// A missing or unreadable `root` yields `Ok(None)`; callers treat that the
/// same as an archive without an entry file.
pub fn find_entry_file(root: &Path) -> io::Result<Option<PathBuf>> {
    if !root.is_dir() {
        return Ok(None);
    }
    find_entry_at(root, 0)
}

fn find_entry_at(dir: &Path, depth: usize) -> io::Result<Option<PathBuf>> {
    if depth > MAX_SEARCH_DEPTH {
        return Ok(None);
    }

    // Root-level entry file takes priority over anything nested.
    if dir.join(ENTRY_FILE_NAME).is_file() {
        return Ok(Some(PathBuf::from(ENTRY_FILE_NAME)));
    }

    for subdir in sorted_subdirs(dir)? {
        let name = subdir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if is_skipped_dir(&name) {
            continue;
        }
        if let Some(nested) = find_entry_at(&subdir, depth + 1)? {
            return Ok(Some(PathBuf::from(name).join(nested)));
        }
    }

    Ok(None)
}

/// List immediate subdirectories of `dir`, sorted by file name.
///
/// Sorting makes the first-match tie-break deterministic; `read_dir` order
/// is not stable across filesystems.
pub(crate) fn sorted_subdirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}
