//! Raster backend: `tiny-skia` surface, `ttf-parser` glyphs.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Surface, fill, image blit | `tiny_skia::Pixmap` |
//! | Glyph advances | `ttf_parser::Face::glyph_hor_advance` |
//! | Glyph outlines | `ttf_parser::Face::outline_glyph` → `tiny_skia::PathBuilder` |
//! | Encode → PNG | `tiny_skia::Pixmap::encode_png` |
//!
//! Text is laid out glyph by glyph from horizontal advances, without shaping
//! or kerning. Characters the face has no glyph for advance by half an em and
//! draw nothing.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use super::canvas::{BackgroundImage, Canvas, CanvasBackend, CanvasError, Rgb, TextStyle};
use super::fonts::FontBook;

/// Creates [`SkiaCanvas`] surfaces sharing one [`FontBook`].
#[derive(Debug, Clone)]
pub struct SkiaBackend {
    fonts: FontBook,
}

impl SkiaBackend {
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }
}

impl CanvasBackend for SkiaBackend {
    type Canvas = SkiaCanvas;

    fn create(&self, width: u32, height: u32) -> Result<SkiaCanvas, CanvasError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidSize { width, height })?;
        Ok(SkiaCanvas {
            pixmap,
            fonts: self.fonts.clone(),
            style: None,
        })
    }
}

pub struct SkiaCanvas {
    pixmap: Pixmap,
    fonts: FontBook,
    style: Option<TextStyle>,
}

impl Canvas for SkiaCanvas {
    fn fill(&mut self, color: Rgb) {
        self.pixmap.fill(color.to_skia());
    }

    fn draw_image(&mut self, image: &BackgroundImage, x: f32, y: f32) {
        self.pixmap.draw_pixmap(
            x.round() as i32,
            y.round() as i32,
            image.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn set_text_style(&mut self, style: TextStyle) -> Result<(), CanvasError> {
        self.fonts.get(style.weight).face()?;
        self.style = Some(style);
        Ok(())
    }

    fn measure_text(&self, text: &str) -> f32 {
        let Some(style) = self.style else {
            return 0.0;
        };
        let Ok(face) = self.fonts.get(style.weight).face() else {
            return 0.0;
        };
        place_glyphs(&face, text, style.size).1
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let Some(style) = self.style else {
            return;
        };
        let Ok(face) = self.fonts.get(style.weight).face() else {
            return;
        };
        let scale = style.size / face.units_per_em().max(1) as f32;
        let baseline = y + face.ascender() as f32 * scale;

        let mut paint = Paint::default();
        paint.set_color(style.color.to_skia());
        paint.anti_alias = true;

        let (glyphs, _) = place_glyphs(&face, text, style.size);
        for (glyph, offset) in glyphs {
            let mut builder = GlyphPathBuilder::new(x + offset, baseline, scale);
            if face.outline_glyph(glyph, &mut builder).is_none() {
                continue;
            }
            let Some(path) = builder.finish() else {
                continue;
            };
            self.pixmap.fill_path(
                &path,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        self.pixmap
            .encode_png()
            .map_err(|e| CanvasError::Encode(e.to_string()))
    }
}

/// Glyphs with their x offsets from the pen origin, plus the total advance.
fn place_glyphs(face: &Face<'_>, text: &str, size: f32) -> (Vec<(GlyphId, f32)>, f32) {
    let units_per_em = face.units_per_em().max(1) as f32;
    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen_x = 0.0f32;
    for ch in text.chars() {
        let Some(glyph) = face.glyph_index(ch) else {
            pen_x += size * 0.5;
            continue;
        };
        glyphs.push((glyph, pen_x));
        let advance = face.glyph_hor_advance(glyph).unwrap_or(0) as f32;
        pen_x += advance / units_per_em * size;
    }
    (glyphs, pen_x)
}

/// Converts font-unit outlines (y up) into device-space paths (y down).
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(origin_x: f32, origin_y: f32, scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x,
            origin_y,
            scale,
        }
    }

    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
