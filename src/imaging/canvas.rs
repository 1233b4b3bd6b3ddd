//! Drawing-surface capability and shared imaging types.
//!
//! The [`Canvas`] trait is the small set of 2D operations card composition
//! needs: fill, draw an image, pick a text style, measure, draw text, and
//! encode. [`CanvasBackend`] creates canvases. The production implementation
//! is [`SkiaBackend`](super::skia::SkiaBackend); tests use a recording mock so
//! layout and pipeline logic run without fonts or pixels.

use std::sync::Arc;
use thiserror::Error;
use tiny_skia::Pixmap;

use super::fonts::FontError;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("Font error: {0}")]
    Font(#[from] FontError),
}

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.0, self.1, self.2, 0xFF)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Font, size and color for a text block. `size` is in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub size: f32,
    pub color: Rgb,
}

/// A decoded background image, premultiplied and ready to draw.
///
/// Cheap to clone; the pixel buffer is shared.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pixmap: Arc<Pixmap>,
}

impl BackgroundImage {
    /// Convert straight-alpha RGBA pixels into a premultiplied pixmap.
    ///
    /// Returns `None` for zero-sized images.
    pub fn from_rgba(rgba: &image::RgbaImage) -> Option<Self> {
        let (width, height) = rgba.dimensions();
        let mut pixmap = Pixmap::new(width, height)?;
        for (src, dst) in rgba
            .as_raw()
            .chunks_exact(4)
            .zip(pixmap.data_mut().chunks_exact_mut(4))
        {
            let a = src[3];
            dst[0] = premultiply(src[0], a);
            dst[1] = premultiply(src[1], a);
            dst[2] = premultiply(src[2], a);
            dst[3] = a;
        }
        Some(Self {
            pixmap: Arc::new(pixmap),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    let prod = channel as u16 * alpha as u16 + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

/// 2D drawing operations used by card composition.
///
/// Text is positioned by the top of its em box ("top" baseline), so `y` is
/// the upper edge of the line.
pub trait Canvas {
    /// Fill the whole surface.
    fn fill(&mut self, color: Rgb);

    /// Draw an image at its natural size with its top-left corner at `(x, y)`.
    /// Parts falling outside the surface are clipped.
    fn draw_image(&mut self, image: &BackgroundImage, x: f32, y: f32);

    /// Select the style used by subsequent `measure_text` / `fill_text` calls.
    fn set_text_style(&mut self, style: TextStyle) -> Result<(), CanvasError>;

    /// Advance width of `text` in the current style.
    fn measure_text(&self, text: &str) -> f32;

    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    fn encode_png(&self) -> Result<Vec<u8>, CanvasError>;
}

/// Creates drawing surfaces.
pub trait CanvasBackend {
    type Canvas: Canvas;

    fn create(&self, width: u32, height: u32) -> Result<Self::Canvas, CanvasError>;
}
