//! Path-resolution strategies for serving assets of uploaded projects.
//!
//! Third-party bundles frequently reference assets by root-absolute paths
//! (`/main.abc123ef.js`), which miss the project's `/projects/{id}/...`
//! mount. Given the `Referer` of the page that issued the request, the
//! resolver maps such requests back to files inside the extracted project
//! directory by trying a fixed sequence of guesses:
//!
//! 1. sibling-relative: the referer's directory joined with the request path
//! 2. project root: `{root}/{project_id}{request_path}`
//! 3. dist subfolder: `{root}/{project_id}/dist{request_path}`
//! 4. recursive search for the exact filename (hashed-asset names only)
//!
//! The first existing file wins. Strategies 1-3 are pure path construction
//! (see [`candidate_paths`]); only strategy 4 walks the filesystem.

use std::io;
use std::path::{Path, PathBuf};

use crate::entry::{is_skipped_dir, sorted_subdirs, MAX_SEARCH_DEPTH};

/// URL prefix under which extracted projects are served.
pub const PROJECTS_PREFIX: &str = "/projects/";

/// Minimum basename length for the recursive-search strategy.
///
/// Hashed bundle assets (`main.abc123ef.js`) are long; generic names like
/// `app.js` or `index.html` are not safe to match by name alone anywhere in
/// the tree.
const RECURSIVE_SEARCH_MIN_LEN: usize = 8;

/// Referer context extracted from a `/projects/{id}/...` page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefererProject {
    /// The project id segment of the referring page's path.
    pub project_id: String,
    /// The referring page's directory, relative to the projects root
    /// (e.g. `"550e.../sub"` for `/projects/550e.../sub/index.html`).
    pub relative_dir: String,
}

/// Parse a referer URL path into a [`RefererProject`].
///
/// Returns `None` unless the path has the shape `/projects/{id}/...` with a
/// non-empty id. The directory is the path up to its last segment; a path
/// ending in `/` is already a directory and only loses the trailing slash.
///
/// The referer is attacker-supplied just like the request path: a `..`
/// segment anywhere in it would let the candidate paths step outside the
/// projects root, so such paths are rejected outright.
pub fn parse_referer_path(referer_path: &str) -> Option<RefererProject> {
    let rest = referer_path.strip_prefix(PROJECTS_PREFIX)?;
    let project_id = rest.split('/').next().filter(|s| !s.is_empty())?.to_string();

    let relative_dir = match rest.strip_suffix('/') {
        Some(dir) => dir.to_string(),
        None => match rest.rsplit_once('/') {
            Some((dir, _file)) => dir.to_string(),
            // Bare `/projects/{id}` -- the directory is the id itself.
            None => rest.to_string(),
        },
    };

    // The first segment of `relative_dir` is always `project_id`, so this
    // check covers both fields.
    if relative_dir
        .split('/')
        .any(|seg| seg.is_empty() || seg == "..")
    {
        return None;
    }

    Some(RefererProject {
        project_id,
        relative_dir,
    })
}

/// Normalize a request path into a path relative to the projects root.
///
/// Rejects paths with `..` segments so a crafted request cannot probe
/// outside the storage root. Returns `None` for empty or unsafe paths.
pub fn sanitize_request_path(request_path: &str) -> Option<String> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.split('/').any(|seg| seg == "..") {
        return None;
    }
    Some(trimmed.to_string())
}

/// Build the strategy 1-3 candidate paths, in evaluation order.
///
/// `request_path` must already be sanitized via [`sanitize_request_path`].
pub fn candidate_paths(
    projects_root: &Path,
    referer: &RefererProject,
    request_path: &str,
) -> Vec<PathBuf> {
    vec![
        // Strategy 1: sibling-relative guess from the referer's directory.
        projects_root.join(&referer.relative_dir).join(request_path),
        // Strategy 2: project-root guess.
        projects_root.join(&referer.project_id).join(request_path),
        // Strategy 3: dist-subfolder guess.
        projects_root
            .join(&referer.project_id)
            .join("dist")
            .join(request_path),
    ]
}

/// Whether strategy 4 (recursive filename search) applies to this request.
///
/// Only filenames that look like hashed bundle assets qualify: the basename
/// must contain a `.` and be longer than [`RECURSIVE_SEARCH_MIN_LEN`]
/// characters.
pub fn wants_recursive_search(request_path: &str) -> bool {
    let basename = request_path.rsplit('/').next().unwrap_or(request_path);
    basename.contains('.') && basename.len() > RECURSIVE_SEARCH_MIN_LEN
}

/// Strategy 4: recursively search `root` for a file named exactly
/// `filename`, returning the first match.
///
/// Uses the same traversal as the entry-file locator: files in the current
/// directory first, then subdirectories in lexicographic order, skipping
/// dependency-manager and hidden directories, bounded by
/// [`MAX_SEARCH_DEPTH`]. A missing `root` yields `Ok(None)`.
pub fn find_file_by_name(root: &Path, filename: &str) -> io::Result<Option<PathBuf>> {
    if !root.is_dir() {
        return Ok(None);
    }
    find_file_at(root, filename, 0)
}

fn find_file_at(dir: &Path, filename: &str, depth: usize) -> io::Result<Option<PathBuf>> {
    if depth > MAX_SEARCH_DEPTH {
        return Ok(None);
    }

    let candidate = dir.join(filename);
    if candidate.is_file() {
        return Ok(Some(candidate));
    }

    for subdir in sorted_subdirs(dir)? {
        let name = subdir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if is_skipped_dir(&name) {
            continue;
        }
        if let Some(found) = find_file_at(&subdir, filename, depth + 1)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
