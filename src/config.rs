//! Card configuration module.
//!
//! Handles loading, validating, and merging `og-card.toml`. Values are layered:
//! stock defaults, then the config file, then command-line flags. Each layer
//! only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! directory = "public/og"              # Where cards are written (required)
//! base = "https://example.com/og"      # Public URL prefix (required)
//! background_image = "assets/card.png" # Drawn under the text (optional)
//! naming = "stem"                      # "stem" or "path"
//!
//! [text]
//! title_selector = "h1"                # Replaces the <title> lookup
//! description_selector = "meta[property='og:description']"
//!
//! [fonts]
//! title = "fonts/Inter-Bold.ttf"       # Default: system sans-serif bold, else bundled DejaVu Sans
//! body = "fonts/Inter-Regular.ttf"     # Default: system sans-serif regular, else bundled
//! ```
//!
//! `directory` and `base` have no defaults. A config that still lacks them
//! after all layers are merged fails with [`ConfigError::Missing`] when
//! [`CardConfig::render_options`] is called, before any document is read.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::imaging::{FontBook, FontError};
use crate::options::RenderOptions;
use crate::types::Document;

pub const CONFIG_FILE: &str = "og-card.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required option: {0}")]
    Missing(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Card configuration loaded from `og-card.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,
    pub naming: Naming,
    pub text: TextConfig,
    pub fonts: FontsConfig,
}

/// How a document maps to its card name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Naming {
    /// File stem: `blog/post.html` → `post`.
    #[default]
    Stem,
    /// Path below the source root, `.`-joined: `blog/post.html` → `blog.post`.
    Path,
}

/// Selectors replacing the default title/description lookups.
///
/// A selector's value is the matched element's `content` attribute, or its
/// text when it has none. A selector that matches nothing falls back to the
/// default lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_selector: Option<String>,
}

/// Font files. Unset faces are looked up among system fonts, then bundled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<PathBuf>,
}

impl CardConfig {
    /// Validate values that can be checked without touching documents.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(ConfigError::Validation("base must not be empty".into()));
        }
        if self.directory.as_deref() == Some(Path::new("")) {
            return Err(ConfigError::Validation(
                "directory must not be empty".into(),
            ));
        }
        for (key, selector) in [
            ("text.title_selector", &self.text.title_selector),
            ("text.description_selector", &self.text.description_selector),
        ] {
            if selector.as_deref().is_some_and(|s| s.trim().is_empty()) {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// Build the per-document resolvers.
    ///
    /// `source_root` is the directory documents are read from; `naming =
    /// "path"` names cards by the document path relative to it.
    pub fn render_options(&self, source_root: &Path) -> Result<RenderOptions, ConfigError> {
        let mut builder = RenderOptions::builder();

        if let Some(directory) = self.directory.clone() {
            builder = builder.directory(move |_| directory.clone());
        }
        if let Some(base) = self.base.clone() {
            builder = builder.base(move |_| base.clone());
        }
        if self.naming == Naming::Path {
            let root = source_root.to_path_buf();
            builder = builder.name(move |doc| path_name(&root, doc));
        }
        if let Some(selector) = self.text.title_selector.clone() {
            builder = builder.title(move |doc, query| {
                query
                    .value(&selector)
                    .unwrap_or_else(|| crate::options::default_title(doc, query))
            });
        }
        if let Some(selector) = self.text.description_selector.clone() {
            builder = builder.description(move |doc, query| {
                query
                    .value(&selector)
                    .unwrap_or_else(|| crate::options::default_description(doc, query))
            });
        }
        if let Some(background) = self.background_image.clone() {
            builder = builder.background_image(move |_| background.clone());
        }

        builder.build()
    }

    /// Load the configured fonts, falling back to system faces.
    pub fn font_book(&self) -> Result<FontBook, FontError> {
        FontBook::load(self.fonts.title.as_deref(), self.fonts.body.as_deref())
    }
}

/// Card name from the document path below `root`, components joined with `.`.
///
/// Documents outside `root` use their full path.
pub fn path_name(root: &Path, doc: &Document) -> String {
    let relative = doc.path.strip_prefix(root).unwrap_or(&doc.path);
    let stem = relative.with_extension("");
    stem.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Command-line values layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub directory: Option<PathBuf>,
    pub base: Option<String>,
    pub background_image: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Sparse TOML table holding only the flags that were given.
    pub fn to_toml(&self) -> toml::Value {
        let mut table = toml::map::Map::new();
        if let Some(directory) = &self.directory {
            table.insert(
                "directory".into(),
                toml::Value::String(directory.to_string_lossy().into_owned()),
            );
        }
        if let Some(base) = &self.base {
            table.insert("base".into(), toml::Value::String(base.clone()));
        }
        if let Some(background) = &self.background_image {
            table.insert(
                "background_image".into(),
                toml::Value::String(background.to_string_lossy().into_owned()),
            );
        }
        toml::Value::Table(table)
    }
}

/// Stock defaults as a TOML value, the bottom layer of every merge.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CardConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge layers in order onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<CardConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: CardConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path` (if present) and apply `overrides`.
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<CardConfig, ConfigError> {
    let file = load_raw_config(path)?;
    if file.is_none() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
    }
    resolve_config(
        stock_defaults_value(),
        file.into_iter().chain([overrides.to_toml()]),
    )
}

/// Returns a fully-commented stock `og-card.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# og-card Configuration
# =====================
# Only `directory` and `base` are required. Unknown keys are an error.
# Both may also be given on the command line (--directory, --base), which
# overrides this file.

# Directory generated card images are written to. Created if missing.
directory = "public/og"

# Public URL prefix for the cards. The card URL is "{base}/{name}.png".
# og:image / twitter:image:src tags are only rewritten when their current
# URL uses letters, digits and ; : / ? . only.
base = "https://example.com/og"

# Image drawn at the top-left corner of every card at its natural size.
# PNG, JPEG or WebP. Omit for a plain white card.
# background_image = "assets/card-background.png"

# Card naming:
#   "stem" -> blog/post.html becomes post.png
#   "path" -> blog/post.html becomes blog.post.png (unique across the tree)
naming = "stem"

# ---------------------------------------------------------------------------
# Card text
# ---------------------------------------------------------------------------
[text]
# CSS selectors replacing the default lookups. The first match's `content`
# attribute is used, or its text when it has none. Defaults: the <title>
# text and <meta name="description">.
# title_selector = "h1"
# description_selector = "meta[property='og:description']"

# ---------------------------------------------------------------------------
# Fonts (TrueType/OpenType). Unset faces use the system sans-serif, or the
# bundled DejaVu Sans when the host has none.
# ---------------------------------------------------------------------------
[fonts]
# title = "fonts/Inter-Bold.ttf"
# body = "fonts/Inter-Regular.ttf"
"##
}
