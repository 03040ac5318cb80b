//! Document layout.
//!
//! - [`canvas`] - the drawing primitives ([`Canvas`]) and a recording
//!   implementation
//! - [`engine`] - bubble, separator and attachment placement
//! - [`metrics`] - text measurement with the embedded font
//! - [`pdf`] - the `printpdf` backend

pub mod canvas;
pub mod engine;
pub mod metrics;
pub mod pdf;

pub use canvas::{Align, Canvas, DrawOp, Paint, Rect, RecordingCanvas, Rgb, TextStyle};
pub use engine::{
    DateSeparators, LayoutEngine, LayoutSummary, MediaSlot, bubble_height, truncate_label,
};
pub use metrics::FontMetrics;
pub use pdf::PdfCanvas;
