//! Card rendering.
//!
//! | Concern | Crate / function |
//! |---|---|
//! | **Surface** | `tiny_skia::Pixmap` |
//! | **Glyphs** | `ttf_parser` outlines + advances |
//! | **System fonts** | `fontdb` sans-serif query, bundled DejaVu Sans fallback |
//! | **Encode → PNG** | `Pixmap::encode_png` |
//!
//! The module is split into:
//! - **Canvas**: [`Canvas`] / [`CanvasBackend`] traits and shared types
//! - **Skia**: [`SkiaBackend`], the raster implementation
//! - **Fonts**: [`FontBook`] loading from files or the system
//! - **Params**: fixed card geometry ([`CardLayout`])
//! - **Compose**: [`compose_card`], drawing a card onto any backend

pub mod canvas;
pub mod compose;
pub mod fonts;
mod params;
pub mod skia;

pub use canvas::{
    BackgroundImage, Canvas, CanvasBackend, CanvasError, FontWeight, Rgb, TextStyle,
};
pub use compose::{CardText, compose_card};
pub use fonts::{FontBook, FontError};
pub use params::{BlockStyle, CARD_HEIGHT, CARD_WIDTH, CardLayout, pt};
pub use skia::SkiaBackend;
