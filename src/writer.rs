//! Filesystem output: card directories and streamed PNG writes.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create directory {path}: {source}")]
    Directory { path: PathBuf, source: io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Make sure `path` exists as a directory, creating missing ancestors.
///
/// Calling this on an existing directory is a no-op; creation racing with
/// another creator of the same directory also succeeds. A non-directory
/// already at `path` is an [`OutputError::Directory`] here, before any card
/// is written.
pub fn ensure_directory(path: &Path) -> Result<(), OutputError> {
    if path.is_dir() {
        return Ok(());
    }
    tracing::debug!(path = %path.display(), "creating card directory");
    fs::create_dir_all(path).map_err(|source| OutputError::Directory {
        path: path.to_path_buf(),
        source,
    })
}

/// Stream `bytes` into a file at `path`, replacing any existing file.
///
/// Returns once the data has been flushed and synced. The parent directory
/// must already exist.
pub fn write_stream(path: &Path, mut bytes: impl Read) -> Result<u64, OutputError> {
    let err = |source: io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(err)?;
    let mut writer = BufWriter::new(file);
    let written = io::copy(&mut bytes, &mut writer).map_err(err)?;
    let file = writer.into_inner().map_err(|e| err(e.into_error()))?;
    file.sync_all().map_err(err)?;
    Ok(written)
}

/// Write `contents` to `path` in one shot, flushing before returning.
pub fn write_document(path: &Path, contents: &[u8]) -> Result<(), OutputError> {
    let err = |source: io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(err)?;
    file.write_all(contents).map_err(err)?;
    file.flush().map_err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_directory_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a/b/c");
        ensure_directory(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("cards");
        ensure_directory(&dir).unwrap();
        ensure_directory(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_directory_fails_over_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("taken");
        fs::write(&file, "x").unwrap();
        let err = ensure_directory(&file.join("sub")).unwrap_err();
        assert!(matches!(err, OutputError::Directory { .. }));
    }

    #[test]
    fn ensure_directory_rejects_existing_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("cards");
        fs::write(&file, "x").unwrap();
        let err = ensure_directory(&file).unwrap_err();
        assert!(matches!(err, OutputError::Directory { ref path, .. } if path == &file));
        assert_eq!(fs::read_to_string(&file).unwrap(), "x");
    }

    #[test]
    fn write_stream_writes_all_bytes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("card.png");
        let data = vec![7u8; 100_000];
        let written = write_stream(&path, data.as_slice()).unwrap();
        assert_eq!(written, 100_000);
        assert_eq!(fs::read(&path).unwrap(), data);
    }

    #[test]
    fn write_stream_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("card.png");
        fs::write(&path, b"old contents that are longer").unwrap();
        write_stream(&path, &b"new"[..]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn write_stream_missing_parent_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing/card.png");
        let err = write_stream(&path, &b"x"[..]).unwrap_err();
        assert!(matches!(err, OutputError::Write { .. }));
        assert!(err.to_string().contains("card.png"));
    }

    #[test]
    fn write_document_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.html");
        write_document(&path, b"<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
