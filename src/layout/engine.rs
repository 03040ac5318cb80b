//! Bubble layout.
//!
//! Messages are drawn top to bottom as rounded bubbles: outgoing on the
//! right in green, incoming on the left in grey, each with an initials
//! avatar beside it. A pill with the date is inserted whenever the day
//! changes. Attachments are drawn inside the bubble, under the text, and
//! link to the copy in the media folder.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::canvas::{Align, Canvas, PAGE_WIDTH, Paint, Rect, Rgb, TextStyle};
use crate::config::{LayoutConfig, MEDIA_DIR_NAME, is_file};
use crate::media::MediaMap;
use crate::message::{MediaKind, Message};
use crate::sanitize::sanitize;

pub const LEFT_X: f32 = 25.0;
pub const RIGHT_X: f32 = 110.0;
pub const BUBBLE_WIDTH: f32 = 80.0;
pub const MIN_BUBBLE_HEIGHT: f32 = 18.0;
pub const CONTENT_FONT_SIZE: f32 = 11.0;
pub const LINE_HEIGHT: f32 = 5.0;
pub const BUBBLE_PADDING: f32 = 10.0;
pub const CORNER_RADIUS: f32 = 5.0;
pub const AVATAR_RADIUS: f32 = 7.0;
/// Vertical gap after each bubble.
pub const MESSAGE_GAP: f32 = 10.0;
/// A bubble whose bottom (plus gap) would pass this line goes to a new page.
pub const BOTTOM_LIMIT: f32 = 270.0;
/// Cursor position at the top of every page after the first.
pub const TOP_MARGIN: f32 = 20.0;
/// Cursor position where the first page starts.
pub const FIRST_PAGE_TOP: f32 = 10.0;

pub const SEPARATOR_X: f32 = 60.0;
pub const SEPARATOR_WIDTH: f32 = 90.0;
pub const SEPARATOR_HEIGHT: f32 = 8.0;
pub const SEPARATOR_ADVANCE: f32 = 10.0;

/// Square thumbnail side: the bubble width less 20, capped at 60.
pub const IMAGE_SIZE: f32 = 60.0;
pub const IMAGE_MEDIA_HEIGHT: f32 = IMAGE_SIZE + 3.0;
pub const OTHER_MEDIA_HEIGHT: f32 = 12.0;

/// Labels longer than this are shortened around an ellipsis.
pub const LABEL_MAX_CHARS: usize = 24;

const OUTGOING_FILL: Rgb = Rgb(220, 248, 198);
const INCOMING_FILL: Rgb = Rgb(245, 245, 245);
const BUBBLE_STROKE: Rgb = Rgb(220, 220, 220);
const SHADOW: Rgb = Rgb(210, 210, 210);
const AVATAR_FILL: Rgb = Rgb(180, 200, 230);
const AVATAR_STROKE: Rgb = Rgb(150, 170, 200);
const SEPARATOR_FILL: Rgb = Rgb(230, 230, 230);
const DARK: Rgb = Rgb(10, 10, 10);
const MUTED: Rgb = Rgb(120, 120, 120);
const BODY: Rgb = Rgb(60, 60, 60);
const TITLE: Rgb = Rgb(30, 144, 255);
const IMAGE_ICON: Rgb = Rgb(100, 180, 100);
const AUDIO_ICON: Rgb = Rgb(30, 144, 255);
const FILE_ICON: Rgb = Rgb(180, 120, 40);
const MISSING: Rgb = Rgb(200, 0, 0);

const IMAGE_GLYPH: &str = "📷";
const AUDIO_GLYPH: &str = "🔊";
const FILE_GLYPH: &str = "📎";

/// Text under the title explaining how attachment links behave.
pub const MEDIA_NOTE: &str = "Note: attachments link to files in the medias folder next to this PDF. \
     To open one in a new tab, right-click the link (behavior depends on the PDF viewer).";

/// Extensions that can be embedded as thumbnails.
const EMBEDDABLE_IMAGES: &[&str] = &["jpg", "jpeg", "png"];

/// Height of a bubble holding `lines` wrapped content lines plus an
/// attachment area of `media_height`.
pub fn bubble_height(lines: usize, media_height: f32) -> f32 {
    let text_height = (lines + 1) as f32 * LINE_HEIGHT;
    (text_height + BUBBLE_PADDING + media_height).max(MIN_BUBBLE_HEIGHT)
}

/// Shortens `name` to its first 7 and last 10 characters when it is longer
/// than [`LABEL_MAX_CHARS`].
pub fn truncate_label(name: &str) -> String {
    let count = name.chars().count();
    if count <= LABEL_MAX_CHARS {
        return name.to_string();
    }
    let head: String = name.chars().take(7).collect();
    let tail: String = name.chars().skip(count - 10).collect();
    format!("{head}...{tail}")
}

/// Tracks the day of the last separator drawn.
#[derive(Debug, Default, Clone)]
pub struct DateSeparators {
    last: String,
}

impl DateSeparators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key to draw when `timestamp` starts a new day. Timestamps
    /// too short to carry a date never produce a separator.
    pub fn next<'m>(&mut self, message: &'m Message) -> Option<&'m str> {
        let key = message.date_key();
        if key.is_empty() || key == self.last {
            return None;
        }
        self.last = key.to_string();
        Some(key)
    }
}

fn has_extension(name: &str, allowed: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| allowed.iter().any(|a| e.eq_ignore_ascii_case(a)))
}

/// How an attachment is going to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSlot {
    Image { path: PathBuf, link: String },
    Audio { name: String, link: String },
    File { name: String, link: String },
    /// Drawn as a red placeholder.
    Missing { label: String },
}

impl MediaSlot {
    pub fn is_missing(&self) -> bool {
        matches!(self, MediaSlot::Missing { .. })
    }
}

/// Counters describing a finished layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutSummary {
    pub messages: usize,
    pub separators: usize,
    pub pages: usize,
    pub images: usize,
    pub audio: usize,
    pub files: usize,
    pub missing: usize,
}

/// Draws messages onto a [`Canvas`].
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    media_dir: PathBuf,
}

impl<'a> LayoutEngine<'a> {
    /// `media_dir` is where resolved files live; links point to
    /// `medias/<name>` relative to the document.
    pub fn new(config: &'a LayoutConfig, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            media_dir: media_dir.into(),
        }
    }

    /// Lays out every message. The canvas must already have its first page.
    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        messages: &[Message],
        media: &MediaMap,
    ) -> LayoutSummary {
        let mut summary = LayoutSummary::default();
        let mut dates = DateSeparators::new();
        let mut y = self.draw_header(canvas) + 8.0;

        for msg in messages {
            let lines = Self::content_lines(canvas, &msg.content);
            let height = bubble_height(lines.len(), Self::media_height(msg, media));
            let separator = dates.next(msg);

            // a date pill always stays on the page of the bubble it announces
            let mut needed = height + MESSAGE_GAP;
            if separator.is_some() {
                needed += SEPARATOR_ADVANCE;
            }
            if y + needed > BOTTOM_LIMIT {
                y = Self::new_page(canvas, y);
            }

            if let Some(date) = separator {
                Self::draw_separator(canvas, y, date);
                y += SEPARATOR_ADVANCE;
                summary.separators += 1;
            }

            self.draw_message(canvas, y, msg, &lines, height, media, &mut summary);
            y += height + MESSAGE_GAP;
            summary.messages += 1;
        }

        summary.pages = canvas.page_count();
        debug!(?summary, "layout finished");
        summary
    }

    /// Draws the title and note, returning the cursor below them.
    fn draw_header<C: Canvas + ?Sized>(&self, canvas: &mut C) -> f32 {
        let margin = 10.0;
        let full = PAGE_WIDTH - 2.0 * margin;
        let mut y = FIRST_PAGE_TOP;

        if let Some(title) = self.config.title.as_deref().filter(|t| !t.is_empty()) {
            canvas.text_cell(
                Rect::new(margin, y, full, 12.0),
                &sanitize(title),
                &TextStyle::bold(16.0, TITLE),
                Align::Center,
                None,
            );
            y += 12.0 + 2.0;
        }

        if self.config.show_note {
            let style = TextStyle::regular(9.0, MUTED);
            for line in canvas.split_text(MEDIA_NOTE, full, style.size) {
                let rect = Rect::new(margin, y, full, 5.0);
                canvas.text_cell(rect, &line, &style, Align::Center, None);
                y += 5.0;
            }
            y += 2.0;
        }

        y
    }

    fn new_page<C: Canvas + ?Sized>(canvas: &mut C, y: f32) -> f32 {
        // A bubble taller than a whole page still starts at the top margin,
        // so never open a page that would stay empty.
        if y > TOP_MARGIN {
            canvas.add_page();
        }
        TOP_MARGIN
    }

    fn draw_separator<C: Canvas + ?Sized>(canvas: &mut C, y: f32, date: &str) {
        canvas.rounded_rect(
            Rect::new(SEPARATOR_X, y, SEPARATOR_WIDTH, SEPARATOR_HEIGHT),
            3.0,
            Paint::fill(SEPARATOR_FILL),
        );
        canvas.text_cell(
            Rect::new(SEPARATOR_X, y + 1.0, SEPARATOR_WIDTH, 6.0),
            &sanitize(date),
            &TextStyle::regular(9.0, MUTED),
            Align::Center,
            None,
        );
    }

    /// Wrapped content lines; an empty paragraph still takes one line.
    pub fn content_lines<C: Canvas + ?Sized>(canvas: &C, content: &str) -> Vec<String> {
        let width = BUBBLE_WIDTH - 12.0;
        let mut lines = Vec::new();
        for para in sanitize(content).split('\n') {
            let para = para.trim_end_matches('\r');
            let wrapped = canvas.split_text(para, width, CONTENT_FONT_SIZE);
            if wrapped.is_empty() {
                lines.push(String::new());
            } else {
                lines.extend(wrapped);
            }
        }
        lines
    }

    /// Extra bubble height reserved for the attachment.
    pub fn media_height(msg: &Message, media: &MediaMap) -> f32 {
        if !msg.has_media() {
            return 0.0;
        }
        match media.get(&msg.media_reference) {
            Some(name)
                if msg.media_kind == MediaKind::Image && has_extension(name, EMBEDDABLE_IMAGES) =>
            {
                IMAGE_MEDIA_HEIGHT
            }
            _ => OTHER_MEDIA_HEIGHT,
        }
    }

    /// Decides how the attachment of `msg` is drawn, checking the media
    /// folder for the resolved file.
    pub fn media_slot(&self, msg: &Message, media: &MediaMap) -> Option<MediaSlot> {
        if !msg.has_media() {
            return None;
        }
        let Some(name) = media.get(&msg.media_reference).filter(|n| !n.is_empty()) else {
            return Some(MediaSlot::Missing {
                label: "[Missing media]".to_string(),
            });
        };

        let path = self.media_dir.join(name);
        let exists = is_file(&path);
        let link = format!("{MEDIA_DIR_NAME}/{name}");

        let slot = if msg.media_kind == MediaKind::Image && has_extension(name, EMBEDDABLE_IMAGES) {
            if exists {
                MediaSlot::Image { path, link }
            } else {
                MediaSlot::Missing {
                    label: "[Missing image]".to_string(),
                }
            }
        } else if msg.media_kind == MediaKind::Audio || has_extension(name, &["mp3"]) {
            if exists {
                MediaSlot::Audio {
                    name: name.to_string(),
                    link,
                }
            } else {
                MediaSlot::Missing {
                    label: format!("[Missing audio {name}]"),
                }
            }
        } else if exists {
            MediaSlot::File {
                name: name.to_string(),
                link,
            }
        } else {
            MediaSlot::Missing {
                label: format!("[Missing file {name}]"),
            }
        };
        Some(slot)
    }

    /// Draws one bubble of `height` with its top at `y`.
    #[allow(clippy::too_many_arguments)]
    fn draw_message<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        y: f32,
        msg: &Message,
        lines: &[String],
        height: f32,
        media: &MediaMap,
        summary: &mut LayoutSummary,
    ) {
        let outgoing = self.config.is_local(&msg.sender);
        let (x, avatar_x, fill) = if outgoing {
            (RIGHT_X, RIGHT_X + BUBBLE_WIDTH + 5.0, OUTGOING_FILL)
        } else {
            (LEFT_X, LEFT_X - AVATAR_RADIUS * 2.0 - 5.0, INCOMING_FILL)
        };
        let text_height = (lines.len() + 1) as f32 * LINE_HEIGHT;

        // avatar
        canvas.circle(
            avatar_x + AVATAR_RADIUS,
            y + AVATAR_RADIUS + 2.0,
            AVATAR_RADIUS,
            Paint::fill_stroke(AVATAR_FILL, AVATAR_STROKE),
        );
        canvas.text_cell(
            Rect::new(avatar_x, y + AVATAR_RADIUS - 4.0, AVATAR_RADIUS * 2.0, AVATAR_RADIUS * 2.0),
            &sanitize(&msg.initials()),
            &TextStyle::bold(9.0, DARK),
            Align::Center,
            None,
        );

        canvas.rounded_rect(
            Rect::new(x + 2.0, y + 2.0, BUBBLE_WIDTH, height + 2.0),
            CORNER_RADIUS,
            Paint::fill(SHADOW),
        );
        canvas.rounded_rect(
            Rect::new(x, y, BUBBLE_WIDTH, height),
            CORNER_RADIUS,
            Paint::fill_stroke(fill, BUBBLE_STROKE),
        );

        canvas.text_cell(
            Rect::new(x + 6.0, y + 2.0, BUBBLE_WIDTH - 12.0, 5.0),
            &sanitize(&msg.sender),
            &TextStyle::bold(10.0, DARK),
            Align::Left,
            None,
        );
        canvas.text_cell(
            Rect::new(x + BUBBLE_WIDTH - 28.0, y + 2.0, 25.0, 4.0),
            &sanitize(&msg.timestamp),
            &TextStyle::regular(8.0, MUTED),
            Align::Right,
            None,
        );

        let body = TextStyle::regular(CONTENT_FONT_SIZE, BODY);
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_y = y + 8.0 + i as f32 * LINE_HEIGHT;
            canvas.text_cell(
                Rect::new(x + 6.0, line_y, BUBBLE_WIDTH - 12.0, LINE_HEIGHT),
                line,
                &body,
                Align::Left,
                None,
            );
        }

        if let Some(slot) = self.media_slot(msg, media) {
            let icon_y = y + text_height + 2.0;
            Self::draw_media(canvas, x, icon_y, slot, &msg.media_reference, summary);
        }
    }

    fn draw_media<C: Canvas + ?Sized>(
        canvas: &mut C,
        x: f32,
        icon_y: f32,
        slot: MediaSlot,
        reference: &str,
        summary: &mut LayoutSummary,
    ) {
        let icon_x = x + 8.0;
        let icon = Rect::new(icon_x, icon_y, 18.0, 8.0);
        let label = Rect::new(icon_x + 20.0, icon_y, BUBBLE_WIDTH - 38.0, 8.0);

        match slot {
            MediaSlot::Image { path, link } => {
                let frame_x = x + BUBBLE_WIDTH - IMAGE_SIZE - 5.0;
                let frame = Rect::new(frame_x, icon_y, IMAGE_SIZE, IMAGE_SIZE);
                if let Err(e) = canvas.image(&path, frame, Some(&link)) {
                    warn!("Could not embed image {}: {e}", path.display());
                    Self::draw_missing(canvas, icon_x, icon_y, "[Missing image]", summary);
                    return;
                }
                canvas.text_cell(
                    icon,
                    &sanitize(IMAGE_GLYPH),
                    &TextStyle::bold(10.0, IMAGE_ICON),
                    Align::Center,
                    Some(&link),
                );
                summary.images += 1;
            }
            MediaSlot::Audio { name, link } => {
                let style = TextStyle::bold(10.0, AUDIO_ICON);
                canvas.text_cell(icon, &sanitize(AUDIO_GLYPH), &style, Align::Center, Some(&link));
                let text = sanitize(&format!("Audio: {}", truncate_label(&name)));
                let style = TextStyle::regular(9.0, AUDIO_ICON);
                canvas.text_cell(label, &text, &style, Align::Left, Some(&link));
                summary.audio += 1;
            }
            MediaSlot::File { name, link } => {
                let style = TextStyle::bold(10.0, FILE_ICON);
                canvas.text_cell(icon, &sanitize(FILE_GLYPH), &style, Align::Center, Some(&link));
                let text = sanitize(&format!("File: {}", truncate_label(&name)));
                let style = TextStyle::regular(9.0, FILE_ICON);
                canvas.text_cell(label, &text, &style, Align::Left, Some(&link));
                summary.files += 1;
            }
            MediaSlot::Missing { label } => {
                debug!(reference, "drawing placeholder");
                Self::draw_missing(canvas, icon_x, icon_y, &label, summary);
            }
        }
    }

    fn draw_missing<C: Canvas + ?Sized>(
        canvas: &mut C,
        icon_x: f32,
        icon_y: f32,
        label: &str,
        summary: &mut LayoutSummary,
    ) {
        canvas.text_cell(
            Rect::new(icon_x, icon_y, BUBBLE_WIDTH - 16.0, 10.0),
            &sanitize(label),
            &TextStyle::regular(CONTENT_FONT_SIZE, MISSING),
            Align::Left,
            None,
        );
        summary.missing += 1;
    }
}
