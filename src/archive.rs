//! Archive input: validation, extraction and transcript discovery.
//!
//! The export zip is unpacked into a scratch directory once. Everything
//! downstream (transcript parsing, media lookup) works on that directory.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ChatPdfError, Result};

/// Folder macOS adds to zips it creates; never part of the export.
pub const RESERVED_DIR: &str = "__MACOSX";

/// One entry of the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path relative to the archive root.
    pub path: PathBuf,
    /// Directory entries carry no data.
    pub is_dir: bool,
    /// Uncompressed content.
    pub data: Vec<u8>,
}

/// Checks that `path` exists, is a regular file and has a `.zip` extension.
pub fn validate_input(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)
        .map_err(|_| ChatPdfError::invalid_input(path, "file does not exist"))?;
    if metadata.is_dir() {
        return Err(ChatPdfError::invalid_input(path, "path is a directory"));
    }
    let is_zip = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return Err(ChatPdfError::invalid_input(path, "expected a .zip extension"));
    }
    Ok(())
}

/// Reads every entry outside [`RESERVED_DIR`] into memory.
///
/// Entries whose names would escape the archive root are rejected.
pub fn read_entries(archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ChatPdfError::archive(archive_path, e))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ChatPdfError::archive(archive_path, e))?;

        if entry.name().contains(RESERVED_DIR) {
            continue;
        }

        let path = entry.enclosed_name().ok_or_else(|| ChatPdfError::UnsafeEntry {
            name: entry.name().to_string(),
        })?;

        let is_dir = entry.is_dir();
        let mut data = Vec::new();
        if !is_dir {
            entry.read_to_end(&mut data)?;
        }
        entries.push(ArchiveEntry { path, is_dir, data });
    }

    Ok(entries)
}

/// Extracts the archive under `dest`, returning the number of files written.
pub fn extract(archive_path: &Path, dest: &Path) -> Result<usize> {
    let mut written = 0;
    for entry in read_entries(archive_path)? {
        let target = dest.join(&entry.path);
        if entry.is_dir {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &entry.data)?;
        debug!(path = %entry.path.display(), bytes = entry.data.len(), "extracted");
        written += 1;
    }
    Ok(written)
}

/// Returns the first `.txt` file in depth-first order. Siblings are visited
/// in file name order so the choice is stable when several exist.
pub fn find_transcript(root: &Path) -> Result<PathBuf> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_txt = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if is_txt {
            return Ok(entry.into_path());
        }
    }
    Err(ChatPdfError::TranscriptNotFound {
        dir: root.to_path_buf(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    /// Builds a zip at `path` from `(name, content)` pairs. Names ending in
    /// `/` become directory entries.
    pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_validate_input() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("Chat.ZIP");
        write_zip(&zip_path, &[("chat.txt", b"x")]);
        assert!(validate_input(&zip_path).is_ok());

        let missing = dir.path().join("missing.zip");
        assert!(validate_input(&missing).unwrap_err().is_invalid_input());

        assert!(validate_input(dir.path()).unwrap_err().is_invalid_input());

        let rar = dir.path().join("chat.rar");
        fs::write(&rar, b"x").unwrap();
        assert!(validate_input(&rar).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_read_entries_skips_reserved_dir() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("chat.zip");
        write_zip(
            &zip_path,
            &[
                ("chat.txt", b"hello"),
                ("media/", b""),
                ("media/a.jpg", b"jpg"),
                ("__MACOSX/._chat.txt", b"junk"),
            ],
        );

        let entries = read_entries(&zip_path).unwrap();
        let names: Vec<String> = entries
            .iter()
            .map(|e| e.path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert!(names.contains(&"chat.txt".to_string()));
        assert!(names.contains(&"media/a.jpg".to_string()));
        assert!(!names.iter().any(|n| n.contains(RESERVED_DIR)));

        let dir_entry = entries.iter().find(|e| e.is_dir).unwrap();
        assert!(dir_entry.data.is_empty());
    }

    #[test]
    fn test_extract_and_find_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("chat.zip");
        write_zip(
            &zip_path,
            &[
                ("nested/deeper/_chat.TXT", b"[01/02/2023, 10:00:00] Ana: hi"),
                ("nested/photo.jpg", b"jpg"),
            ],
        );

        let out = dir.path().join("out");
        let written = extract(&zip_path, &out).unwrap();
        assert_eq!(written, 2);
        assert!(out.join("nested/photo.jpg").exists());

        let transcript = find_transcript(&out).unwrap();
        assert!(transcript.ends_with("_chat.TXT"));
    }

    #[test]
    fn test_find_transcript_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("photo.jpg"), b"x").unwrap();
        let err = find_transcript(dir.path()).unwrap_err();
        assert!(err.is_transcript_not_found());
    }

    #[test]
    fn test_corrupt_archive() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("broken.zip");
        fs::write(&zip_path, b"this is not a zip").unwrap();
        let err = read_entries(&zip_path).unwrap_err();
        assert!(matches!(err, ChatPdfError::Archive { .. }));
    }
}
