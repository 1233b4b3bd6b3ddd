//! Shared types threaded through every pipeline stage.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// An HTML document handed to the pipeline by the surrounding build step.
///
/// `contents` is `None` for a "null" document (a path the build step knows
/// about but has no bytes for). Those pass through the pipeline untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub contents: Option<Vec<u8>>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: Some(contents.into()),
        }
    }

    /// A document without contents.
    pub fn null(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: None,
        }
    }

    /// Read a document from disk.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read(path)?;
        Ok(Self::new(path, contents))
    }

    pub fn is_null(&self) -> bool {
        self.contents.is_none()
    }

    /// File stem of the document path: `blog/index.html` → `index`.
    ///
    /// Used as the default card name.
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Contents decoded as UTF-8 (lossy). Empty for null documents.
    pub fn text(&self) -> String {
        self.contents
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }

    /// Same document path with new contents.
    pub fn with_contents(&self, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: self.path.clone(),
            contents: Some(contents.into()),
        }
    }
}

/// Where a generated card lives on disk and where it is published.
///
/// ```text
/// physical path: {directory}/{name}.png
/// public URL:    {base}/{name}.png
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRef {
    pub path: PathBuf,
    pub url: String,
}

impl CardRef {
    pub fn new(directory: &Path, base: &str, name: &str) -> Self {
        let filename = format!("{name}.png");
        Self {
            path: directory.join(&filename),
            url: format!("{base}/{filename}"),
        }
    }
}
