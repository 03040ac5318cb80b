//! Configuration types.
//!
//! A [`Config`] is built once (by the binary from its command-line
//! arguments, or by library users directly) and passed by reference to every
//! component that needs it. Nothing in the crate reads ambient settings.
//!
//! # Example
//!
//! ```rust
//! use chatpdf::config::{Config, LayoutConfig};
//!
//! let config = Config::new("chat.zip")
//!     .with_output_dir("out")
//!     .with_layout(LayoutConfig::new().with_local_participant("Ana"));
//!
//! assert!(config.document_path().ends_with("chat_export.pdf"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name of the generated document inside the output directory.
pub const DOCUMENT_NAME: &str = "chat_export.pdf";

/// Name of the media subdirectory inside the output directory.
pub const MEDIA_DIR_NAME: &str = "medias";

/// Default location of the cached fallback font.
pub const DEFAULT_FONT_CACHE: &str = "DejaVuSans.ttf";

/// Where the fallback font is fetched from when nothing local is usable.
pub const DEFAULT_FONT_URL: &str =
    "https://github.com/prawnpdf/prawn/raw/master/data/fonts/DejaVuSans.ttf";

/// Settings for transcript line parsing.
///
/// The attachment marker words are locale dependent; both English and
/// Portuguese exports are recognized by default.
///
/// # Example
///
/// ```rust
/// use chatpdf::config::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_wrapper_word("adjunto")
///     .with_attached_suffix("archivo adjunto");
/// assert!(config.wrapper_words.contains(&"adjunto".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Words used inside `<word: filename>` attachment markers.
    pub wrapper_words: Vec<String>,

    /// Suffixes used in `filename (suffix)` attachment markers.
    pub attached_suffixes: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            wrapper_words: vec!["attached".to_string(), "anexado".to_string()],
            attached_suffixes: vec!["file attached".to_string(), "arquivo anexado".to_string()],
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a word recognized inside `<word: filename>` markers.
    #[must_use]
    pub fn with_wrapper_word(mut self, word: impl Into<String>) -> Self {
        self.wrapper_words.push(word.into());
        self
    }

    /// Adds a suffix recognized in `filename (suffix)` markers.
    #[must_use]
    pub fn with_attached_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.attached_suffixes.push(suffix.into());
        self
    }
}

/// Settings for the document layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Messages whose sender contains this name (case-insensitive) are drawn
    /// on the right as outgoing. Everyone else is incoming.
    pub local_participant: Option<String>,

    /// Header line drawn at the top of the first page.
    pub title: Option<String>,

    /// Draw the explanatory note about media links under the title.
    pub show_note: bool,
}

impl LayoutConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the local participant name.
    #[must_use]
    pub fn with_local_participant(mut self, name: impl Into<String>) -> Self {
        self.local_participant = Some(name.into());
        self
    }

    /// Sets the title line.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enables or disables the media note.
    #[must_use]
    pub fn with_note(mut self, show: bool) -> Self {
        self.show_note = show;
        self
    }

    /// Returns `true` if `sender` is the local participant.
    pub fn is_local(&self, sender: &str) -> bool {
        match &self.local_participant {
            Some(name) if !name.trim().is_empty() => sender
                .to_lowercase()
                .contains(&name.trim().to_lowercase()),
            _ => false,
        }
    }
}

/// Where to look for the TTF font used in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    /// A font given explicitly by the user. When set, nothing else is tried.
    pub explicit: Option<PathBuf>,

    /// Local cache path, checked first and used as the download target.
    pub cache_path: PathBuf,

    /// Download location; `None` disables downloading.
    pub download_url: Option<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            explicit: None,
            cache_path: PathBuf::from(DEFAULT_FONT_CACHE),
            download_url: Some(DEFAULT_FONT_URL.to_string()),
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Input zip archive.
    pub archive: PathBuf,

    /// Directory receiving the document and the media folder.
    pub output_dir: PathBuf,

    /// Transcoder executable (name on `PATH` or full path).
    pub ffmpeg: String,

    /// Remove the previous document and media folder before the run
    /// (default: true). Other files in the output directory are left alone.
    pub clean_output: bool,

    /// Font lookup settings.
    pub font: FontConfig,

    /// Transcript parsing settings.
    pub parser: ParserConfig,

    /// Layout settings.
    pub layout: LayoutConfig,
}

impl Config {
    /// Creates a configuration for `archive` with default values.
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            output_dir: PathBuf::from("output"),
            ffmpeg: "ffmpeg".to_string(),
            clean_output: true,
            font: FontConfig::default(),
            parser: ParserConfig::default(),
            layout: LayoutConfig::default().with_note(true),
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the transcoder executable.
    #[must_use]
    pub fn with_ffmpeg(mut self, program: impl Into<String>) -> Self {
        self.ffmpeg = program.into();
        self
    }

    /// Sets whether the previous document and media folder are removed first.
    #[must_use]
    pub fn with_clean_output(mut self, clean: bool) -> Self {
        self.clean_output = clean;
        self
    }

    /// Replaces the font settings.
    #[must_use]
    pub fn with_font(mut self, font: FontConfig) -> Self {
        self.font = font;
        self
    }

    /// Replaces the parser settings.
    #[must_use]
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the layout settings.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Path of the generated PDF.
    pub fn document_path(&self) -> PathBuf {
        self.output_dir.join(DOCUMENT_NAME)
    }

    /// Path of the media folder.
    pub fn media_dir(&self) -> PathBuf {
        self.output_dir.join(MEDIA_DIR_NAME)
    }

    /// Makes the output directory ready for a run.
    ///
    /// With `clean_output` the previous document and media folder are
    /// removed. Only those two entries are ever deleted; anything else in
    /// the output directory, the archive included, stays in place. The media
    /// folder is then created.
    pub fn prepare_output(&self) -> Result<()> {
        if self.clean_output {
            let document = self.document_path();
            if is_file(&document) {
                fs::remove_file(&document)?;
            }
            let media = self.media_dir();
            if media.is_dir() {
                fs::remove_dir_all(&media)?;
            }
        }
        fs::create_dir_all(self.media_dir())?;
        Ok(())
    }

    /// File name of the archive, used in the document title.
    pub fn archive_name(&self) -> String {
        self.archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Returns `true` if `path` names an existing regular file.
pub(crate) fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
