//! Font loading for card text.
//!
//! Two faces are needed: bold for the title, regular for the description.
//! Each comes from a configured font file or, when none is configured, from
//! the system font database via `fontdb`:
//!
//! 1. the generic sans-serif family
//! 2. common sans families by name (DejaVu Sans, Liberation Sans, ...)
//! 3. any upright face of the wanted weight
//! 4. the DejaVu Sans pair bundled under `assets/fonts/`
//!
//! Font data is parsed once at load time so a bad file fails before any
//! document is processed.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use ttf_parser::Face;

use super::canvas::FontWeight;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse font {0}")]
    Parse(String),
}

static BUNDLED_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BUNDLED_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Named families tried after the generic sans-serif lookup, which fontdb
/// maps to "Arial" unless told otherwise.
const SANS_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Open Sans",
    "Helvetica",
    "Arial",
];

/// Raw font bytes plus the face index inside a collection.
#[derive(Debug, Clone)]
pub struct FontData {
    data: Arc<Vec<u8>>,
    index: u32,
    label: String,
}

impl FontData {
    /// Wrap font bytes, validating that they parse.
    pub fn new(data: Vec<u8>, index: u32, label: impl Into<String>) -> Result<Self, FontError> {
        let label = label.into();
        Face::parse(&data, index).map_err(|_| FontError::Parse(label.clone()))?;
        Ok(Self {
            data: Arc::new(data),
            index,
            label,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(data, 0, path.display().to_string())
    }

    pub fn face(&self) -> Result<Face<'_>, FontError> {
        Face::parse(&self.data, self.index).map_err(|_| FontError::Parse(self.label.clone()))
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The regular and bold faces used for card text.
#[derive(Debug, Clone)]
pub struct FontBook {
    pub regular: FontData,
    pub bold: FontData,
}

impl FontBook {
    /// Load the two faces. `None` paths fall back to system fonts, then to
    /// the bundled faces.
    pub fn load(bold: Option<&Path>, regular: Option<&Path>) -> Result<Self, FontError> {
        let mut system = None;
        let mut resolve = |path: Option<&Path>, weight| match path {
            Some(path) => FontData::from_file(path),
            None => {
                let db = system.get_or_insert_with(|| {
                    let mut db = fontdb::Database::new();
                    db.load_system_fonts();
                    tracing::debug!(faces = db.len(), "loaded system font database");
                    db
                });
                match system_font(db, weight)? {
                    Some(font) => Ok(font),
                    None => {
                        tracing::debug!(?weight, "no system sans-serif face, using bundled font");
                        bundled_font(weight)
                    }
                }
            }
        };
        let bold = resolve(bold, FontWeight::Bold)?;
        let regular = resolve(regular, FontWeight::Regular)?;
        tracing::debug!(bold = bold.label(), regular = regular.label(), "fonts ready");
        Ok(Self { regular, bold })
    }

    /// System sans-serif regular and bold, or the bundled pair.
    pub fn system() -> Result<Self, FontError> {
        Self::load(None, None)
    }

    /// The bundled DejaVu Sans pair, independent of the host.
    pub fn bundled() -> Result<Self, FontError> {
        Ok(Self {
            regular: bundled_font(FontWeight::Regular)?,
            bold: bundled_font(FontWeight::Bold)?,
        })
    }

    pub fn get(&self, weight: FontWeight) -> &FontData {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn bundled_font(weight: FontWeight) -> Result<FontData, FontError> {
    match weight {
        FontWeight::Regular => FontData::new(BUNDLED_REGULAR.to_vec(), 0, "DejaVu Sans (bundled)"),
        FontWeight::Bold => FontData::new(BUNDLED_BOLD.to_vec(), 0, "DejaVu Sans Bold (bundled)"),
    }
}

fn system_font(db: &fontdb::Database, weight: FontWeight) -> Result<Option<FontData>, FontError> {
    let target = match weight {
        FontWeight::Regular => fontdb::Weight::NORMAL,
        FontWeight::Bold => fontdb::Weight::BOLD,
    };
    let mut families = vec![fontdb::Family::SansSerif];
    families.extend(SANS_FAMILIES.iter().copied().map(fontdb::Family::Name));

    let id = db
        .query(&fontdb::Query {
            families: &families,
            weight: target,
            ..fontdb::Query::default()
        })
        .or_else(|| {
            db.faces()
                .find(|face| {
                    face.weight == target && face.style == fontdb::Style::Normal && !face.monospaced
                })
                .map(|face| face.id)
        });
    let Some(id) = id else {
        return Ok(None);
    };

    let label = db
        .face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "sans-serif".to_string());
    let Some((data, index)) = db.with_face_data(id, |data, index| (data.to_vec(), index)) else {
        return Ok(None);
    };
    FontData::new(data, index, label).map(Some)
}
