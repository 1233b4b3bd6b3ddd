//! Greedy word wrapping.
//!
//! Pure functions, no I/O. Text measurement is passed in as a closure so the
//! algorithm can be tested with a fake metric and driven by a real font in
//! production.
//!
//! ## Algorithm
//!
//! Words are appended to a running line. Before each append the candidate
//! `line + word + " "` is measured; if it is wider than `max_width` and the
//! line already holds a word, the line is committed at the current `y`, the
//! word starts the next line and `y` advances by `line_height`. Whatever is
//! left after the last word is committed as the final line.
//!
//! This is single-pass and has no lookahead, so it is not width-optimal, but
//! it is deterministic for a fixed font and width. A word wider than
//! `max_width` is never split; it overflows on a line of its own.

/// One committed line: text plus the top-left position it is drawn at.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Lines for one text block, in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<LayoutLine>,
    /// `y` of the last committed line (equal to the start `y` when empty).
    /// The next block is stacked relative to this value.
    pub y_end: f32,
}

/// Geometry of a text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapBox {
    pub x: f32,
    pub y: f32,
    pub max_width: f32,
    pub line_height: f32,
}

/// Break `text` into lines no wider than `max_width` where possible.
///
/// ```
/// # use og_card::layout::{wrap, WrapBox};
/// // every character is 10 units wide
/// let measure = |s: &str| s.chars().count() as f32 * 10.0;
/// let bounds = WrapBox { x: 0.0, y: 100.0, max_width: 80.0, line_height: 20.0 };
/// let layout = wrap("aaa bbb ccc", bounds, measure);
/// let lines: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();
/// assert_eq!(lines, ["aaa bbb", "ccc"]);
/// assert_eq!(layout.y_end, 120.0);
/// ```
pub fn wrap(text: &str, bounds: WrapBox, measure: impl Fn(&str) -> f32) -> TextLayout {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut y = bounds.y;

    for word in text.split_whitespace() {
        let candidate = format!("{line}{word} ");
        if measure(&candidate) > bounds.max_width && !line.is_empty() {
            lines.push(commit(&line, bounds.x, y));
            line = format!("{word} ");
            y += bounds.line_height;
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(commit(&line, bounds.x, y));
    }

    TextLayout { lines, y_end: y }
}

fn commit(line: &str, x: f32, y: f32) -> LayoutLine {
    LayoutLine {
        text: line.trim_end().to_string(),
        x,
        y,
    }
}
