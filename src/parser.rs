//! Transcript line parser.
//!
//! WhatsApp writes one of two line shapes depending on the device that
//! produced the export:
//!
//! - iOS: `[01/02/2023, 10:00:00] Sender: Message`
//! - Android: `01/02/2023 10:00 - Sender: Message`
//!
//! Each line is tried against the grammars in that order. Lines matching
//! neither (continuations of multi-line messages, system banners) are
//! dropped without comment.
//!
//! Attachments show up inside the message text as either
//! `<attached: IMG-0001.jpg>` or `IMG-0001.jpg (file attached)`. The marker
//! word is localized, see [`ParserConfig`].

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::Message;
use crate::config::ParserConfig;
use crate::error::Result;

/// Invisible direction marks WhatsApp sprinkles around attachment lines.
const DIRECTION_MARKS: &[char] = &['\u{200E}', '\u{200F}', '\u{FEFF}'];

/// Supported line shapes, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineGrammar {
    /// `[<timestamp>] <sender>: <content>`
    Bracketed,
    /// `<DD/MM/YYYY HH:MM> - <sender>: <content>`
    Dashed,
}

impl LineGrammar {
    /// All grammars in priority order.
    pub const ALL: [LineGrammar; 2] = [LineGrammar::Bracketed, LineGrammar::Dashed];

    fn pattern(self) -> &'static str {
        match self {
            // [01/02/2023, 10:00:00] Ana: Hello
            LineGrammar::Bracketed => r"^[\s\x{200E}\x{200F}\x{FEFF}]*\[(.*?)\] (.*?): (.*)$",
            // 01/02/2023 10:00 - Bob: Hello
            LineGrammar::Dashed => {
                r"^[\s\x{200E}\x{200F}\x{FEFF}]*(\d{2}/\d{2}/\d{4} \d{2}:\d{2}) - (.*?): (.*)$"
            }
        }
    }
}

/// Attachment markers, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentMarker {
    /// `<attached: filename>`
    Wrapped,
    /// `filename (file attached)`
    Suffixed,
}

/// Parses transcript text into [`Message`]s.
///
/// # Example
///
/// ```rust
/// use chatpdf::parser::TranscriptParser;
/// use chatpdf::MediaKind;
///
/// let parser = TranscriptParser::new()?;
/// let msg = parser
///     .parse_line("[01/02/2023, 10:00:00] Ana: Hello <attached: photo.jpg>")
///     .unwrap();
///
/// assert_eq!(msg.content, "Hello");
/// assert_eq!(msg.media_reference, "photo.jpg");
/// assert_eq!(msg.media_kind, MediaKind::Image);
/// # Ok::<(), chatpdf::ChatPdfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TranscriptParser {
    grammars: Vec<(LineGrammar, Regex)>,
    markers: Vec<(AttachmentMarker, Regex)>,
}

impl TranscriptParser {
    /// Creates a parser with the default marker words.
    pub fn new() -> Result<Self> {
        Self::with_config(&ParserConfig::default())
    }

    /// Creates a parser with custom marker words.
    pub fn with_config(config: &ParserConfig) -> Result<Self> {
        let grammars = LineGrammar::ALL
            .iter()
            .map(|g| Ok((*g, Regex::new(g.pattern())?)))
            .collect::<Result<Vec<_>>>()?;

        let mut markers = Vec::with_capacity(2);
        if let Some(words) = alternation(&config.wrapper_words) {
            let regex = Regex::new(&format!(r"<(?:{words}): ([^>]+)>"))?;
            markers.push((AttachmentMarker::Wrapped, regex));
        }
        if let Some(suffixes) = alternation(&config.attached_suffixes) {
            let regex = Regex::new(&format!(r"(.*?) \((?:{suffixes})\)"))?;
            markers.push((AttachmentMarker::Suffixed, regex));
        }

        Ok(Self { grammars, markers })
    }

    /// Parses a single line, returning `None` if no grammar matches.
    pub fn parse_line(&self, line: &str) -> Option<Message> {
        let (_, caps) = self
            .grammars
            .iter()
            .find_map(|(grammar, regex)| regex.captures(line).map(|c| (*grammar, c)))?;

        let timestamp = caps.get(1).map_or("", |m| m.as_str());
        let sender = caps.get(2).map_or("", |m| m.as_str()).trim();
        let raw_content = caps.get(3).map_or("", |m| m.as_str());

        let (content, media) = self.extract_attachment(raw_content);

        let msg = Message::new(timestamp, sender, trim_content(&content));
        Some(match media {
            Some(reference) => msg.with_media(reference),
            None => msg,
        })
    }

    /// Parses every line of `text`, keeping transcript order.
    pub fn parse_str(&self, text: &str) -> Vec<Message> {
        self.parse_lines(text.lines())
    }

    /// Parses a sequence of lines, keeping their order.
    pub fn parse_lines<'a, I>(&self, lines: I) -> Vec<Message>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    /// Reads and parses a transcript file. Invalid UTF-8 sequences are
    /// replaced rather than rejected.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Message>> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.parse_str(&text))
    }

    /// Finds the first attachment marker that matches, returning the content
    /// with that marker removed and the referenced filename.
    fn extract_attachment(&self, content: &str) -> (String, Option<String>) {
        for (_, regex) in &self.markers {
            let Some(caps) = regex.captures(content) else {
                continue;
            };
            let reference = caps
                .get(1)
                .map(|m| trim_content(m.as_str()).to_string())
                .unwrap_or_default();
            let stripped = regex.replace_all(content, "").into_owned();
            if reference.is_empty() {
                return (stripped, None);
            }
            return (stripped, Some(reference));
        }
        (content.to_string(), None)
    }
}

fn alternation(words: &[String]) -> Option<String> {
    let escaped: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        None
    } else {
        Some(escaped.join("|"))
    }
}

fn trim_content(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || DIRECTION_MARKS.contains(&c))
}
