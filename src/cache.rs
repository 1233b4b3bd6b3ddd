//! Decoded background-image cache.
//!
//! Every card in a build usually shares one background. Decoding it per
//! document would dominate the build, so decoded images are kept in memory
//! for the life of the [`BackgroundCache`].
//!
//! # Semantics
//!
//! - **Key**: the absolute background path. `bg.png`, `./bg.png` and
//!   `$PWD/bg.png` share one entry; symlinks are not resolved.
//! - **Fill**: first successful decode of a path. The entry is never replaced,
//!   evicted or invalidated afterwards; editing the file mid-build has no
//!   effect until a new cache is created.
//! - **Failures are not cached**: a path that failed to decode is decoded
//!   again on the next request.
//!
//! # Concurrency
//!
//! The cache is a plain `HashMap` mutated through `&mut self`. The pipeline
//! owns it and processes one document at a time, so loads of the same path
//! never overlap. Sharing it across concurrent documents would need a lock
//! per key or a map of in-flight loads.

use image::ImageReader;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::imaging::BackgroundImage;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read background image {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode background image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Background image {0} has no pixels")]
    Empty(PathBuf),
}

/// Path → decoded image store.
#[derive(Debug, Default)]
pub struct BackgroundCache {
    entries: HashMap<PathBuf, BackgroundImage>,
    stats: CacheStats,
}

impl BackgroundCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the decoded image for `path`, decoding it on first use.
    pub fn load(&mut self, path: &Path) -> Result<BackgroundImage, DecodeError> {
        let key = cache_key(path);
        if let Some(image) = self.entries.get(&key) {
            tracing::debug!(path = %path.display(), "background cache hit");
            self.stats.hit();
            return Ok(image.clone());
        }

        tracing::debug!(path = %path.display(), "background cache miss, decoding");
        self.stats.miss();
        let image = decode_background(path)?;
        self.entries.insert(key, image.clone());
        Ok(image)
    }

    /// [`load`](Self::load) for an optional path. `None` means no background.
    pub fn resolve(&mut self, path: Option<&Path>) -> Result<Option<BackgroundImage>, DecodeError> {
        path.map(|p| self.load(p)).transpose()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&cache_key(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

/// Absolute form of `path`, or `path` itself when the working directory is
/// unavailable.
fn cache_key(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Read and decode an image file into a drawable background.
pub fn decode_background(path: &Path) -> Result<BackgroundImage, DecodeError> {
    let reader = ImageReader::open(path)
        .map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let decoded = reader.decode().map_err(|source| DecodeError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    BackgroundImage::from_rgba(&decoded.to_rgba8())
        .ok_or_else(|| DecodeError::Empty(path.to_path_buf()))
}

/// Decode counts for a build run. Every miss is exactly one decode attempt.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            write!(f, "no background")
        } else {
            write!(
                f,
                "{} cached, {} decoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
            .save(path)
            .unwrap();
    }

    // =========================================================================
    // load
    // =========================================================================

    #[test]
    fn same_path_decodes_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bg.png");
        write_png(&path, 40, 20);

        let mut cache = BackgroundCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();

        assert_eq!((first.width(), first.height()), (40, 20));
        assert_eq!((second.width(), second.height()), (40, 20));
        assert_eq!(cache.stats(), &CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_paths_decode_separately() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.png");
        let b = tmp.path().join("b.png");
        write_png(&a, 4, 4);
        write_png(&b, 8, 8);

        let mut cache = BackgroundCache::new();
        cache.load(&a).unwrap();
        cache.load(&b).unwrap();

        assert_eq!(cache.stats().misses, 2);
        assert_eq!(cache.stats().hits, 0);
        assert!(cache.contains(&a) && cache.contains(&b));
    }

    #[test]
    fn relative_and_absolute_spellings_share_an_entry() {
        let file = tempfile::Builder::new()
            .prefix("og-card-bg-")
            .suffix(".png")
            .tempfile_in(".")
            .unwrap();
        write_png(file.path(), 4, 4);
        let name = file.path().file_name().unwrap();

        let relative = PathBuf::from(name);
        let dotted = Path::new(".").join(name);
        let absolute = std::env::current_dir().unwrap().join(name);

        let mut cache = BackgroundCache::new();
        cache.load(&relative).unwrap();
        cache.load(&dotted).unwrap();
        cache.load(&absolute).unwrap();

        assert_eq!(cache.stats(), &CacheStats { hits: 2, misses: 1 });
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&relative) && cache.contains(&absolute));
    }

    #[test]
    fn hit_does_no_io() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bg.png");
        write_png(&path, 4, 4);

        let mut cache = BackgroundCache::new();
        cache.load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(cache.load(&path).is_ok());
    }

    #[test]
    fn entry_is_not_replaced_after_file_changes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bg.png");
        write_png(&path, 4, 4);

        let mut cache = BackgroundCache::new();
        cache.load(&path).unwrap();
        write_png(&path, 16, 16);

        let again = cache.load(&path).unwrap();
        assert_eq!(again.width(), 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut cache = BackgroundCache::new();
        let err = cache.load(Path::new("/nonexistent/bg.png")).unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn undecodable_file_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bg.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let mut cache = BackgroundCache::new();
        let err = cache.load(&path).unwrap_err();
        assert!(matches!(err, DecodeError::Decode { .. }));
    }

    #[test]
    fn failure_is_not_cached() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("late.png");

        let mut cache = BackgroundCache::new();
        assert!(cache.load(&path).is_err());

        write_png(&path, 2, 2);
        assert!(cache.load(&path).is_ok());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn resolve_none_is_no_background() {
        let mut cache = BackgroundCache::new();
        assert!(cache.resolve(None).unwrap().is_none());
        assert_eq!(cache.stats().total(), 0);
    }

    // =========================================================================
    // CacheStats
    // =========================================================================

    #[test]
    fn cache_stats_display_with_hits() {
        let s = CacheStats { hits: 5, misses: 1 };
        assert_eq!(format!("{}", s), "5 cached, 1 decoded (6 total)");
    }

    #[test]
    fn cache_stats_display_unused() {
        assert_eq!(format!("{}", CacheStats::default()), "no background");
    }
}
