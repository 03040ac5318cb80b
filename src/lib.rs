//! # chatpdf
//!
//! Turns an exported WhatsApp chat archive (the `.zip` produced by
//! "Export chat") into a chat-style PDF, with every attachment copied next
//! to it and linked from the document.
//!
//! ## Overview
//!
//! A conversion runs in four steps:
//!
//! 1. [`archive`] - validate and extract the zip, locate the transcript.
//! 2. [`parser`] - turn transcript lines into [`Message`]s.
//! 3. [`media`] - find each attachment among the extracted files, copy it
//!    into the output media folder, converting Opus voice notes to MP3.
//! 4. [`layout`] - draw bubbles, date separators and attachments onto a
//!    [`Canvas`](layout::Canvas), by default a PDF.
//!
//! Text reaching the document goes through [`sanitize`] first so the
//! embedded font can render it. The font itself comes from [`font`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatpdf::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = Config::new("WhatsApp Chat.zip")
//!         .with_layout(LayoutConfig::new().with_local_participant("Ana"));
//!
//!     let scratch = tempfile::tempdir()?;
//!     archive::extract(&config.archive, scratch.path())?;
//!     let transcript = archive::find_transcript(scratch.path())?;
//!
//!     let messages = TranscriptParser::with_config(&config.parser)?.parse_file(&transcript)?;
//!
//!     let ffmpeg = Ffmpeg::new(&config.ffmpeg);
//!     let report = MediaResolver::new(&ffmpeg, config.media_dir()).resolve(&messages, scratch.path())?;
//!
//!     let font = FontLocator::new(&config.font).locate()?;
//!     let mut canvas = PdfCanvas::new("chat", &font.path)?;
//!     LayoutEngine::new(&config.layout, config.media_dir()).render(&mut canvas, &messages, &report.map);
//!     canvas.save(&config.document_path())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`config`] - [`Config`](config::Config) and its parts
//! - [`error`] - [`ChatPdfError`], [`MediaError`](error::MediaError), [`Result`]
//! - [`message`] - [`Message`], [`MediaKind`]
//! - [`parser`] - [`TranscriptParser`](parser::TranscriptParser)
//! - [`sanitize`] - emoji tags and font-safe text
//! - [`archive`] - zip extraction and transcript discovery
//! - [`media`] - [`AvailableFileIndex`](media::AvailableFileIndex),
//!   [`MediaResolver`](media::MediaResolver), [`Transcoder`](media::Transcoder)
//! - [`font`] - [`FontLocator`](font::FontLocator)
//! - [`layout`] - [`LayoutEngine`](layout::LayoutEngine), [`PdfCanvas`](layout::PdfCanvas)
//! - [`cli`] - command-line arguments (feature `cli`)
//! - [`prelude`] - convenient re-exports

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod media;
pub mod message;
pub mod parser;
pub mod sanitize;

pub use error::{ChatPdfError, Result};
pub use message::{MediaKind, Message};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatpdf::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{MediaKind, Message};

    pub use crate::error::{
        ChatPdfError, DownloadError, EmbedError, MediaError, Result, TranscodeError,
    };

    pub use crate::config::{Config, FontConfig, LayoutConfig, ParserConfig};

    pub use crate::archive;
    pub use crate::parser::TranscriptParser;
    pub use crate::sanitize::sanitize;

    pub use crate::media::{
        AvailableFileIndex, Ffmpeg, MediaMap, MediaResolver, ResolveReport, Transcoder,
    };

    pub use crate::font::FontLocator;

    pub use crate::layout::{Canvas, LayoutEngine, LayoutSummary, PdfCanvas, RecordingCanvas};
}
