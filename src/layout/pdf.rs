//! [`Canvas`] backed by `printpdf`.

use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use printpdf::image_crate::GenericImageView;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    Actions, Color, Image, ImageTransform, IndirectFontRef, LinkAnnotation, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, TextRenderingMode,
};

use super::canvas::{
    Align, CELL_MARGIN, Canvas, PAGE_HEIGHT, PAGE_WIDTH, PT_TO_MM, Paint, Rect, Rgb, TextStyle,
};
use super::metrics::FontMetrics;
use crate::error::{ChatPdfError, EmbedError, Result};

const LAYER_NAME: &str = "Layer 1";
const IMAGE_DPI: f32 = 300.0;
const CORNER_SEGMENTS: usize = 8;
const CIRCLE_SEGMENTS: usize = 40;
const OUTLINE_THICKNESS: f32 = 0.6;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

/// Top-down mm → PDF point.
fn point(x: f32, y: f32) -> Point {
    Point::new(Mm(x), Mm(PAGE_HEIGHT - y))
}

fn link_rect(rect: Rect) -> printpdf::Rect {
    printpdf::Rect::new(
        Mm(rect.x),
        Mm(PAGE_HEIGHT - rect.bottom()),
        Mm(rect.right()),
        Mm(PAGE_HEIGHT - rect.y),
    )
}

/// Outline of a rounded rectangle as a closed list of points.
fn rounded_outline(rect: Rect, radius: f32) -> Vec<(f32, f32)> {
    let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
    let corners = [
        (rect.right() - r, rect.y + r, -PI / 2.0),
        (rect.right() - r, rect.bottom() - r, 0.0),
        (rect.x + r, rect.bottom() - r, PI / 2.0),
        (rect.x + r, rect.y + r, PI),
    ];
    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let angle = start + (PI / 2.0) * i as f32 / CORNER_SEGMENTS as f32;
            points.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
    }
    points
}

fn circle_outline(cx: f32, cy: f32, radius: f32) -> Vec<(f32, f32)> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / CIRCLE_SEGMENTS as f32;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// A4 document with one embedded TTF font.
///
/// The same font serves regular and bold text; bold is drawn with a thin
/// outline in the text color. Text is measured with the font's own advance
/// widths.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    metrics: FontMetrics,
    pages: usize,
}

impl PdfCanvas {
    /// Creates a document with its first page and registers `font_path`.
    pub fn new(title: &str, font_path: &Path) -> Result<Self> {
        let bytes = fs::read(font_path)?;
        let metrics = FontMetrics::from_bytes(&bytes, font_path)?;

        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        let font = doc
            .add_external_font(bytes.as_slice())
            .map_err(ChatPdfError::render)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            font,
            metrics,
            pages: 1,
        })
    }

    /// Serializes the document and writes it to `path`.
    pub fn save(self, path: &Path) -> Result<()> {
        let bytes = self.doc.save_to_bytes().map_err(ChatPdfError::render)?;
        fs::write(path, bytes).map_err(|source| ChatPdfError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    fn fill_polygon(&self, outline: Vec<(f32, f32)>, paint: Paint) {
        let mode = match (paint.fill, paint.stroke) {
            (Some(_), Some(_)) => PaintMode::FillStroke,
            (Some(_), None) => PaintMode::Fill,
            (None, Some(_)) => PaintMode::Stroke,
            (None, None) => return,
        };
        if let Some(fill) = paint.fill {
            self.layer.set_fill_color(color(fill));
        }
        if let Some(stroke) = paint.stroke {
            self.layer.set_outline_color(color(stroke));
            self.layer.set_outline_thickness(OUTLINE_THICKNESS);
        }
        let ring = outline.into_iter().map(|(x, y)| (point(x, y), false)).collect();
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn add_link(&self, rect: Rect, target: &str) {
        self.layer.add_link_annotation(LinkAnnotation::new(
            link_rect(rect),
            None,
            None,
            Actions::uri(target.to_string()),
            None,
        ));
    }
}

impl Canvas for PdfCanvas {
    fn add_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        self.metrics.text_width(text, size)
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        self.fill_polygon(rounded_outline(rect, radius), paint);
    }

    fn circle(&mut self, center_x: f32, center_y: f32, radius: f32, paint: Paint) {
        self.fill_polygon(circle_outline(center_x, center_y, radius), paint);
    }

    fn text_cell(
        &mut self,
        rect: Rect,
        text: &str,
        style: &TextStyle,
        align: Align,
        link: Option<&str>,
    ) {
        if !text.trim().is_empty() {
            let width = self.text_width(text, style.size);
            let x = match align {
                Align::Left => rect.x + CELL_MARGIN,
                Align::Center => rect.x + (rect.w - width) / 2.0,
                Align::Right => rect.right() - CELL_MARGIN - width,
            };
            let baseline = rect.y + rect.h / 2.0 + 0.3 * style.size * PT_TO_MM;

            self.layer.set_fill_color(color(style.color));
            if style.bold {
                self.layer.set_outline_color(color(style.color));
                self.layer.set_outline_thickness(style.size * 0.04);
                self.layer.set_text_rendering_mode(TextRenderingMode::FillStroke);
            }
            self.layer
                .use_text(text, style.size, Mm(x), Mm(PAGE_HEIGHT - baseline), &self.font);
            if style.bold {
                self.layer.set_text_rendering_mode(TextRenderingMode::Fill);
            }
        }

        if let Some(target) = link {
            self.add_link(rect, target);
        }
    }

    fn image(
        &mut self,
        path: &Path,
        rect: Rect,
        link: Option<&str>,
    ) -> std::result::Result<(), EmbedError> {
        let decoded = printpdf::image_crate::open(path).map_err(|source| EmbedError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let (px_w, px_h) = decoded.dimensions();
        if px_w == 0 || px_h == 0 {
            return Err(EmbedError::Empty {
                path: path.to_path_buf(),
            });
        }

        let natural_w = px_w as f32 / IMAGE_DPI * 25.4;
        let natural_h = px_h as f32 / IMAGE_DPI * 25.4;
        let scale = (rect.w / natural_w).min(rect.h / natural_h);
        let drawn_w = natural_w * scale;
        let drawn_h = natural_h * scale;
        let placed = Rect::new(rect.right() - drawn_w, rect.y, drawn_w, drawn_h);

        Image::from_dynamic_image(&decoded).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(placed.x)),
                translate_y: Some(Mm(PAGE_HEIGHT - placed.bottom())),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );

        if let Some(target) = link {
            self.add_link(placed, target);
        }
        Ok(())
    }
}
