//! Zip archive extraction for uploaded project bundles.

use std::fs;
use std::io;
use std::path::Path;

/// Error type for archive extraction failures.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Filesystem-level failure (create, copy, remove).
    #[error("Archive I/O error: {0}")]
    Io(#[from] io::Error),

    /// The uploaded file is not a readable zip archive.
    #[error("Invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An entry would escape the destination directory (zip-slip).
    #[error("Archive entry has an unsafe path: {0}")]
    UnsafePath(String),
}

/// Extract every entry of the zip at `archive_path` into `dest_dir`,
/// creating the destination if absent and overwriting existing files, then
/// delete the uploaded archive. Returns the number of files written.
///
/// Entries whose names would resolve outside `dest_dir` are rejected rather
/// than extracted. On any error the archive file is left in place and the
/// destination may hold a partial tree; callers must treat the upload as
/// failed before recording any project metadata.
///
/// Extraction is synchronous; call from `spawn_blocking` in async contexts.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<usize, ArchiveError> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    fs::create_dir_all(dest_dir)?;

    let mut files_written = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        // `enclosed_name` is None for names containing `..` or absolute paths.
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ArchiveError::UnsafePath(entry.name().to_string()))?;
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        files_written += 1;
    }

    fs::remove_file(archive_path)?;
    Ok(files_written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Write a zip containing the given (name, contents) entries.
    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, contents) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extracts_nested_entries_and_removes_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("upload.zip");
        write_zip(
            &archive,
            &[
                ("index.html", "<html></html>"),
                ("assets/main.js", "console.log(1)"),
            ],
        );

        let dest = tmp.path().join("extracted");
        let count = extract_archive(&archive, &dest).unwrap();

        assert_eq!(count, 2);
        assert!(dest.join("index.html").is_file());
        assert!(dest.join("assets/main.js").is_file());
        assert!(!archive.exists(), "uploaded archive must be deleted");
    }

    #[test]
    fn test_overwrites_existing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("extracted");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("index.html"), "old").unwrap();

        let archive = tmp.path().join("upload.zip");
        write_zip(&archive, &[("index.html", "new")]);

        extract_archive(&archive, &dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("index.html")).unwrap(), "new");
    }

    #[test]
    fn test_rejects_zip_slip_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("evil.zip");
        write_zip(&archive, &[("../outside.txt", "escape")]);

        let dest = tmp.path().join("extracted");
        let result = extract_archive(&archive, &dest);

        assert!(matches!(result, Err(ArchiveError::UnsafePath(_))));
        assert!(!tmp.path().join("outside.txt").exists());
        assert!(archive.exists(), "archive is kept when extraction fails");
    }

    #[test]
    fn test_invalid_archive_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("not-a-zip.zip");
        fs::write(&archive, b"plain text").unwrap();

        let result = extract_archive(&archive, &tmp.path().join("extracted"));
        assert!(matches!(result, Err(ArchiveError::Zip(_))));
    }
}
