//! The drawing surface the layout engine talks to.
//!
//! Coordinates are millimetres on an A4 portrait page with the origin at the
//! top-left corner and `y` growing downwards. Backends translate to whatever
//! their native system is.

use std::path::{Path, PathBuf};

use crate::error::EmbedError;

/// A4 width in mm.
pub const PAGE_WIDTH: f32 = 210.0;

/// A4 height in mm.
pub const PAGE_HEIGHT: f32 = 297.0;

/// Horizontal padding inside a text cell, in mm.
pub const CELL_MARGIN: f32 = 1.0;

/// Points to millimetres.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// Fill and outline of a shape. At least one should be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
}

impl Paint {
    pub const fn fill(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    pub const fn fill_stroke(fill: Rgb, stroke: Rgb) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(stroke),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn regular(size: f32, color: Rgb) -> Self {
        Self {
            size,
            bold: false,
            color,
        }
    }

    pub const fn bold(size: f32, color: Rgb) -> Self {
        Self {
            size,
            bold: true,
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Width of `text` at `size` points, estimated from average glyph widths of
/// a sans-serif font. Used by canvases that have no font loaded.
pub fn estimate_text_width(text: &str, size: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
            'f' | 't' | 'r' | 'I' | ' ' | '(' | ')' | '[' | ']' | '-' => 0.36,
            'm' | 'w' | 'M' | 'W' | '@' => 0.86,
            c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.66,
            _ => 0.55,
        })
        .sum();
    em * size * PT_TO_MM
}

/// Operations the layout engine needs from a document backend.
pub trait Canvas {
    /// Starts a new page; later drawing goes there.
    fn add_page(&mut self);

    /// Number of pages, including the current one.
    fn page_count(&self) -> usize;

    /// Rendered width of `text` in mm.
    fn text_width(&self, text: &str, size: f32) -> f32 {
        estimate_text_width(text, size)
    }

    /// Word-wraps one paragraph so each line fits in a cell of `width` mm.
    ///
    /// Breaks at spaces; a word longer than the line is split between
    /// characters. Blank input yields no lines.
    fn split_text(&self, text: &str, width: f32, size: f32) -> Vec<String> {
        let max = (width - 2.0 * CELL_MARGIN).max(0.0);
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if self.text_width(&candidate, size) <= max {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if self.text_width(word, size) <= max {
                current = word.to_string();
                continue;
            }
            for c in word.chars() {
                current.push(c);
                if self.text_width(&current, size) > max && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint);

    fn circle(&mut self, center_x: f32, center_y: f32, radius: f32, paint: Paint);

    /// Draws a single line of text vertically centred in `rect`. When `link`
    /// is set the whole cell becomes a hyperlink to that target.
    fn text_cell(
        &mut self,
        rect: Rect,
        text: &str,
        style: &TextStyle,
        align: Align,
        link: Option<&str>,
    );

    /// Embeds the image at `path` scaled into `rect`.
    ///
    /// Failure is reported to the caller, which decides what to draw instead.
    fn image(&mut self, path: &Path, rect: Rect, link: Option<&str>) -> Result<(), EmbedError>;
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Page(usize),
    RoundedRect { rect: Rect, radius: f32, paint: Paint },
    Circle { x: f32, y: f32, radius: f32, paint: Paint },
    Text { rect: Rect, text: String, style: TextStyle, align: Align, link: Option<String> },
    Image { path: PathBuf, rect: Rect, link: Option<String> },
}

/// A canvas that only records what was drawn. Starts on page 1.
///
/// Useful for checking layout decisions without producing a document.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
    pages: usize,
    reject_images: bool,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            pages: 1,
            reject_images: false,
        }
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every [`Canvas::image`] call fail.
    #[must_use]
    pub fn rejecting_images(mut self) -> Self {
        self.reject_images = true;
        self
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every link target attached to a text cell or image.
    pub fn links(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { link: Some(l), .. } | DrawOp::Image { link: Some(l), .. } => {
                    Some(l.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Number of embedded images.
    pub fn images(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn add_page(&mut self) {
        self.pages += 1;
        self.ops.push(DrawOp::Page(self.pages));
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        self.ops.push(DrawOp::RoundedRect { rect, radius, paint });
    }

    fn circle(&mut self, center_x: f32, center_y: f32, radius: f32, paint: Paint) {
        self.ops.push(DrawOp::Circle {
            x: center_x,
            y: center_y,
            radius,
            paint,
        });
    }

    fn text_cell(
        &mut self,
        rect: Rect,
        text: &str,
        style: &TextStyle,
        align: Align,
        link: Option<&str>,
    ) {
        self.ops.push(DrawOp::Text {
            rect,
            text: text.to_string(),
            style: *style,
            align,
            link: link.map(str::to_string),
        });
    }

    fn image(&mut self, path: &Path, rect: Rect, link: Option<&str>) -> Result<(), EmbedError> {
        if self.reject_images {
            return Err(EmbedError::Unsupported {
                path: path.to_path_buf(),
            });
        }
        self.ops.push(DrawOp::Image {
            path: path.to_path_buf(),
            rect,
            link: link.map(str::to_string),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_grows_with_text() {
        let short = estimate_text_width("abc", 11.0);
        let long = estimate_text_width("abcdef", 11.0);
        assert!(long > short);
        assert_eq!(estimate_text_width("", 11.0), 0.0);
        assert!(estimate_text_width("WWW", 10.0) > estimate_text_width("iii", 10.0));
    }

    #[test]
    fn test_split_text_wraps_at_width() {
        let canvas = RecordingCanvas::new();
        let text = "the quick brown fox jumps over the lazy dog ".repeat(5);
        let lines = canvas.split_text(&text, 68.0, 11.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(canvas.text_width(line, 11.0) <= 66.0, "line too wide: {line}");
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_split_text_breaks_long_words() {
        let canvas = RecordingCanvas::new();
        let word = "a".repeat(200);
        let lines = canvas.split_text(&word, 30.0, 11.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_split_text_blank() {
        let canvas = RecordingCanvas::new();
        assert!(canvas.split_text("", 68.0, 11.0).is_empty());
        assert!(canvas.split_text("   ", 68.0, 11.0).is_empty());
        assert_eq!(canvas.split_text("hi", 68.0, 11.0), ["hi"]);
    }

    #[test]
    fn test_recording_canvas() {
        let mut canvas = RecordingCanvas::new();
        assert_eq!(canvas.page_count(), 1);
        canvas.add_page();
        canvas.text_cell(
            Rect::new(0.0, 0.0, 10.0, 5.0),
            "hello",
            &TextStyle::regular(9.0, Rgb::BLACK),
            Align::Left,
            Some("medias/a.jpg"),
        );
        canvas
            .image(Path::new("a.jpg"), Rect::new(0.0, 0.0, 5.0, 5.0), None)
            .unwrap();
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.texts(), ["hello"]);
        assert_eq!(canvas.links(), ["medias/a.jpg"]);
        assert_eq!(canvas.images(), 1);

        let mut failing = RecordingCanvas::new().rejecting_images();
        let err = failing.image(Path::new("a.jpg"), Rect::new(0.0, 0.0, 1.0, 1.0), None);
        assert!(matches!(err, Err(EmbedError::Unsupported { .. })));
    }
}
