//! Text measurement with the advance widths of the embedded font.

use std::fs;
use std::path::Path;

use fontdue::{Font, FontSettings};

use super::canvas::PT_TO_MM;
use crate::error::{ChatPdfError, Result};

/// Horizontal metrics of a TTF font.
///
/// Widths are the sum of glyph advances with no kerning, which is how the
/// PDF backend places the glyphs too.
#[derive(Clone)]
pub struct FontMetrics {
    font: Font,
}

impl FontMetrics {
    /// Parses font data read from `origin`.
    pub fn from_bytes(bytes: &[u8], origin: &Path) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| {
            ChatPdfError::InvalidFont {
                path: origin.to_path_buf(),
                reason: reason.to_string(),
            }
        })?;
        Ok(Self { font })
    }

    /// Reads and parses the font at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, path)
    }

    /// Width of `text` set at `size` points, in mm.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let points: f32 = text
            .chars()
            .map(|c| self.font.metrics(c, size).advance_width)
            .sum();
        points * PT_TO_MM
    }
}
