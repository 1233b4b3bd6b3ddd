//! Card composition: background, title block, description block.
//!
//! Drawing order is fixed: fill with the background color, draw the
//! background image (if any) at the origin at its natural size, then the
//! title and the description. Each text block is skipped when its text is
//! empty. The description is stacked under the last title line; without a
//! title it starts at the same offset below the title origin.

use super::canvas::{BackgroundImage, Canvas, CanvasBackend, CanvasError};
use super::params::{BlockStyle, CardLayout};
use crate::layout::{TextLayout, WrapBox, wrap};

/// Sanitized text for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardText<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

/// Compose a card and return it PNG-encoded.
///
/// The canvas lives only for the duration of this call.
pub fn compose_card(
    backend: &impl CanvasBackend,
    layout: &CardLayout,
    text: CardText<'_>,
    background: Option<&BackgroundImage>,
) -> Result<Vec<u8>, CanvasError> {
    let mut canvas = backend.create(layout.width, layout.height)?;
    canvas.fill(layout.background);

    if let Some(image) = background {
        canvas.draw_image(image, 0.0, 0.0);
    }

    let mut y = layout.title_y;
    if text.title.is_empty() {
        tracing::debug!("empty title, skipping title block");
    } else {
        y = draw_block(&mut canvas, &layout.title, layout.title_box(), text.title)?.y_end;
    }

    if text.description.is_empty() {
        tracing::debug!("empty description, skipping description block");
    } else {
        draw_block(
            &mut canvas,
            &layout.description,
            layout.description_box(y),
            text.description,
        )?;
    }

    canvas.encode_png()
}

fn draw_block(
    canvas: &mut impl Canvas,
    style: &BlockStyle,
    bounds: WrapBox,
    text: &str,
) -> Result<TextLayout, CanvasError> {
    canvas.set_text_style(style.text)?;
    let lines = wrap(text, bounds, |candidate| canvas.measure_text(candidate));
    for line in &lines.lines {
        canvas.fill_text(&line.text, line.x, line.y);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::canvas::tests::{DrawOp, RecordingBackend};
    use crate::imaging::canvas::{FontWeight, Rgb};

    fn compose(backend: &RecordingBackend, title: &str, description: &str) -> Vec<u8> {
        compose_card(
            backend,
            &CardLayout::default(),
            CardText { title, description },
            None,
        )
        .unwrap()
    }

    fn styles(backend: &RecordingBackend) -> Vec<FontWeight> {
        backend
            .get_operations()
            .into_iter()
            .filter_map(|op| match op {
                DrawOp::SetStyle(style) => Some(style.weight),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn creates_fixed_size_canvas_and_fills_white_first() {
        let backend = RecordingBackend::new();
        compose(&backend, "Hello World", "");
        let ops = backend.get_operations();
        assert_eq!(
            ops[0],
            DrawOp::Create {
                width: 1200,
                height: 620
            }
        );
        assert_eq!(ops[1], DrawOp::Fill(Rgb::WHITE));
        assert_eq!(ops.last(), Some(&DrawOp::Encode));
    }

    #[test]
    fn title_drawn_at_origin_offset() {
        let backend = RecordingBackend::new();
        compose(&backend, "Hello World", "");
        assert_eq!(
            backend.texts(),
            vec![("Hello World".to_string(), 86.0, 240.0)]
        );
        assert_eq!(styles(&backend), vec![FontWeight::Bold]);
    }

    #[test]
    fn long_title_wraps_at_700() {
        // Mock metric: 20px per char at 40px title size → 35 chars per 700.
        let backend = RecordingBackend::new();
        let title = "aaaaaaaaaa bbbbbbbbbb cccccccccc dddddddddd";
        compose(&backend, title, "");
        let texts = backend.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(
            texts[0],
            ("aaaaaaaaaa bbbbbbbbbb cccccccccc".to_string(), 86.0, 240.0)
        );
        assert_eq!(texts[1], ("dddddddddd".to_string(), 86.0, 280.0));
    }

    #[test]
    fn description_stacks_70_below_last_title_line() {
        let backend = RecordingBackend::new();
        let title = "aaaaaaaaaa bbbbbbbbbb cccccccccc dddddddddd";
        compose(&backend, title, "A short description");
        let texts = backend.texts();
        assert_eq!(texts[2], ("A short description".to_string(), 86.0, 350.0));
        assert_eq!(styles(&backend), vec![FontWeight::Bold, FontWeight::Regular]);
    }

    #[test]
    fn description_without_title_starts_below_title_origin() {
        let backend = RecordingBackend::new();
        compose(&backend, "", "Only a description");
        assert_eq!(
            backend.texts(),
            vec![("Only a description".to_string(), 86.0, 310.0)]
        );
        assert_eq!(styles(&backend), vec![FontWeight::Regular]);
    }

    #[test]
    fn empty_text_draws_no_text() {
        let backend = RecordingBackend::new();
        let png = compose(&backend, "", "");
        assert!(backend.texts().is_empty());
        assert!(styles(&backend).is_empty());
        assert!(!png.is_empty());
    }

    #[test]
    fn background_drawn_at_origin_before_text() {
        let backend = RecordingBackend::new();
        let rgba = image::RgbaImage::from_pixel(1400, 500, image::Rgba([0, 0, 255, 255]));
        let background = BackgroundImage::from_rgba(&rgba).unwrap();
        compose_card(
            &backend,
            &CardLayout::default(),
            CardText {
                title: "T",
                description: "",
            },
            Some(&background),
        )
        .unwrap();

        let ops = backend.get_operations();
        assert_eq!(
            ops[2],
            DrawOp::DrawImage {
                width: 1400,
                height: 500,
                x: 0.0,
                y: 0.0
            }
        );
        assert!(matches!(ops[3], DrawOp::SetStyle(_)));
    }

    #[test]
    fn identical_input_identical_output() {
        let a = compose(&RecordingBackend::new(), "Title", "Description");
        let b = compose(&RecordingBackend::new(), "Title", "Description");
        assert_eq!(a, b);
    }
}
