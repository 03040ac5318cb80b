//! Parsed chat message type.
//!
//! A [`Message`] is one transcript line that matched a known grammar. The
//! timestamp is kept exactly as written: it is only displayed and used for
//! grouping by day, never interpreted as a calendar date.
//!
//! # Example
//!
//! ```
//! use chatpdf::{MediaKind, Message};
//!
//! let msg = Message::new("01/02/2023, 10:00:00", "Ana", "Hello")
//!     .with_media("photo.jpg");
//!
//! assert_eq!(msg.media_kind, MediaKind::Image);
//! assert_eq!(msg.date_key(), "01/02/2023");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Extensions classified as images (case-insensitive).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Extensions classified as audio (case-insensitive).
pub const AUDIO_EXTENSIONS: &[&str] = &["opus", "mp3", "wav", "m4a", "ogg", "aac"];

/// Number of leading timestamp characters that identify a day.
pub const DATE_KEY_LEN: usize = 10;

/// Classification of an attachment by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// jpg, jpeg, png, gif, bmp, webp
    Image,
    /// opus, mp3, wav, m4a, ogg, aac
    Audio,
    /// Anything else, including messages without an attachment
    #[default]
    Other,
}

impl MediaKind {
    /// Classifies a filename by its extension. Image wins over audio,
    /// though the two extension sets never overlap.
    pub fn from_filename(name: &str) -> Self {
        let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
            return MediaKind::Other;
        };
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Image
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Audio
        } else {
            MediaKind::Other
        }
    }

    /// Human label used in placeholders and link captions.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Audio => "Audio",
            MediaKind::Other => "File",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One chat line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Timestamp text as captured by the grammar that matched.
    pub timestamp: String,

    /// Display name of the author.
    pub sender: String,

    /// Message text with any attachment marker removed, trimmed.
    pub content: String,

    /// Attachment filename as written in the transcript, empty if none.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub media_reference: String,

    /// Classification of `media_reference`.
    #[serde(default)]
    pub media_kind: MediaKind,
}

impl Message {
    /// Creates a message without an attachment.
    pub fn new(
        timestamp: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            sender: sender.into(),
            content: content.into(),
            media_reference: String::new(),
            media_kind: MediaKind::Other,
        }
    }

    /// Builder method to attach a media reference; the kind is derived from
    /// the extension.
    #[must_use]
    pub fn with_media(mut self, reference: impl Into<String>) -> Self {
        self.media_reference = reference.into();
        self.media_kind = MediaKind::from_filename(&self.media_reference);
        self
    }

    /// Returns `true` if the message references an attachment.
    pub fn has_media(&self) -> bool {
        !self.media_reference.is_empty()
    }

    /// Leading [`DATE_KEY_LEN`] characters of the timestamp, or an empty
    /// string when the timestamp is shorter than that.
    pub fn date_key(&self) -> &str {
        match self.timestamp.char_indices().nth(DATE_KEY_LEN) {
            Some((idx, _)) => &self.timestamp[..idx],
            None if self.timestamp.chars().count() == DATE_KEY_LEN => &self.timestamp,
            None => "",
        }
    }

    /// Up to two uppercase initials from the first two words of the sender.
    pub fn initials(&self) -> String {
        self.sender
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}
