//! Fixed card geometry and typography.
//!
//! These describe *where* and *how big*; [`compose`](super::compose) decides
//! what gets drawn. Sizes are in pixels; font sizes given in points are
//! converted at 96 DPI (`1pt = 4/3 px`).
//!
//! ```text
//! ┌──────────────────────────── 1200 ────────────────────────────┐
//! │                                                              │
//! │   (86,240) Title, bold 30pt, wraps at 700, line height 40    │ 620
//! │            ... +70 below the last title line                 │
//! │            Description, 25pt, wraps at 1000, line height 34  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use super::canvas::{FontWeight, Rgb, TextStyle};
use crate::layout::WrapBox;

pub const CARD_WIDTH: u32 = 1200;
pub const CARD_HEIGHT: u32 = 620;

const TEXT_COLOR: Rgb = Rgb(0x3E, 0x46, 0x4E);

/// Convert points to pixels.
pub fn pt(points: f32) -> f32 {
    points * 4.0 / 3.0
}

/// Style and box for one text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub text: TextStyle,
    pub max_width: f32,
    pub line_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    /// Left edge shared by both text blocks.
    pub text_x: f32,
    /// Top of the first title line.
    pub title_y: f32,
    /// Distance from the last title line to the first description line.
    pub description_gap: f32,
    pub title: BlockStyle,
    pub description: BlockStyle,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            background: Rgb::WHITE,
            text_x: 86.0,
            title_y: 240.0,
            description_gap: 70.0,
            title: BlockStyle {
                text: TextStyle {
                    weight: FontWeight::Bold,
                    size: pt(30.0),
                    color: TEXT_COLOR,
                },
                max_width: 700.0,
                line_height: 40.0,
            },
            description: BlockStyle {
                text: TextStyle {
                    weight: FontWeight::Regular,
                    size: pt(25.0),
                    color: TEXT_COLOR,
                },
                max_width: (CARD_WIDTH - 200) as f32,
                line_height: 34.0,
            },
        }
    }
}

impl CardLayout {
    pub fn title_box(&self) -> WrapBox {
        WrapBox {
            x: self.text_x,
            y: self.title_y,
            max_width: self.title.max_width,
            line_height: self.title.line_height,
        }
    }

    /// Description box stacked under a title block that ended at `title_end`.
    pub fn description_box(&self, title_end: f32) -> WrapBox {
        WrapBox {
            x: self.text_x,
            y: title_end + self.description_gap,
            max_width: self.description.max_width,
            line_height: self.description.line_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pt_converts_at_96_dpi() {
        assert_eq!(pt(30.0), 40.0);
        assert_eq!(pt(72.0), 96.0);
    }

    #[test]
    fn default_layout_geometry() {
        let layout = CardLayout::default();
        assert_eq!((layout.width, layout.height), (1200, 620));
        assert_eq!(layout.background, Rgb::WHITE);

        let title = layout.title_box();
        assert_eq!((title.x, title.y), (86.0, 240.0));
        assert_eq!(title.max_width, 700.0);
        assert_eq!(title.line_height, 40.0);
        assert_eq!(layout.title.text.weight, FontWeight::Bold);
    }

    #[test]
    fn description_box_stacks_under_title() {
        let layout = CardLayout::default();
        let desc = layout.description_box(280.0);
        assert_eq!((desc.x, desc.y), (86.0, 350.0));
        assert_eq!(desc.max_width, 1000.0);
        assert_eq!(desc.line_height, 34.0);
        assert_eq!(layout.description.text.weight, FontWeight::Regular);
    }
}
