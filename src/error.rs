//! Error types for chatpdf.
//!
//! Two families live here:
//!
//! - [`ChatPdfError`] covers fatal preconditions. Any of these aborts the run
//!   and is reported by the binary as a single diagnostic line.
//! - [`MediaError`] covers per-attachment failures. These never abort the run:
//!   the media resolver logs them and keeps going, and the layout engine
//!   draws a placeholder where the attachment would have been.
//!
//! [`TranscodeError`], [`EmbedError`] and [`DownloadError`] are what the
//! transcoder, canvas and font download seams report.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatpdf operations.
///
/// # Example
///
/// ```rust
/// use chatpdf::error::Result;
/// use chatpdf::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatPdfError>;

/// Fatal errors. Each variant corresponds to a precondition the conversion
/// cannot proceed without.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatPdfError {
    /// An I/O error occurred outside of the per-media steps.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The external audio transcoder could not be executed.
    #[error("Required transcoder '{program}' was not found or could not be executed")]
    TranscoderMissing {
        /// Program name or path that was checked
        program: String,
    },

    /// The input path is missing, a directory, or not a `.zip` file.
    #[error("Input is not a valid ZIP file: {} ({reason})", path.display())]
    InvalidInput {
        /// Path given on the command line
        path: PathBuf,
        /// What is wrong with it
        reason: &'static str,
    },

    /// The archive could not be opened or read.
    #[error("Failed to read archive {}: {source}", path.display())]
    Archive {
        /// Archive path
        path: PathBuf,
        /// The underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// An attachment marker pattern could not be compiled.
    #[error("Invalid attachment pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// An archive entry would be written outside the extraction directory.
    #[error("Archive entry '{name}' points outside the extraction directory")]
    UnsafeEntry {
        /// Entry name as stored in the archive
        name: String,
    },

    /// No transcript (`.txt`) file was found among the extracted entries.
    #[error("No .txt transcript found in the extracted archive ({})", dir.display())]
    TranscriptNotFound {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// Directory traversal failed.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// No usable TTF font could be located or downloaded.
    #[error("Could not obtain a usable TTF font (tried: {})", format_paths(tried))]
    FontUnavailable {
        /// Every location that was checked
        tried: Vec<PathBuf>,
    },

    /// The font file exists but is not a usable TTF.
    #[error("Font {} could not be parsed: {reason}", path.display())]
    InvalidFont {
        /// Font path
        path: PathBuf,
        /// What the parser reported
        reason: String,
    },

    /// The PDF backend rejected an operation (font registration, encoding).
    #[error("PDF error: {0}")]
    Render(String),

    /// The finished document could not be written.
    #[error("Failed to save PDF to {}: {source}", path.display())]
    Save {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ChatPdfError {
    /// Creates an invalid input error.
    pub fn invalid_input(path: impl Into<PathBuf>, reason: &'static str) -> Self {
        ChatPdfError::InvalidInput {
            path: path.into(),
            reason,
        }
    }

    /// Creates an archive error.
    pub fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        ChatPdfError::Archive {
            path: path.into(),
            source,
        }
    }

    /// Creates a render error from any displayable backend error.
    pub fn render(err: impl std::fmt::Display) -> Self {
        ChatPdfError::Render(err.to_string())
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatPdfError::Io(_))
    }

    /// Returns `true` if the transcoder binary is missing.
    pub fn is_transcoder_missing(&self) -> bool {
        matches!(self, ChatPdfError::TranscoderMissing { .. })
    }

    /// Returns `true` if the input path was rejected.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ChatPdfError::InvalidInput { .. })
    }

    /// Returns `true` if no transcript was found.
    pub fn is_transcript_not_found(&self) -> bool {
        matches!(self, ChatPdfError::TranscriptNotFound { .. })
    }
}

/// Recoverable failures for a single attachment.
#[derive(Debug, Error)]
pub enum MediaError {
    /// No extracted file matched the reference.
    #[error("Media not found: {reference}")]
    NotFound {
        /// Reference as written in the transcript
        reference: String,
    },

    /// The transcoder could not be run or did not succeed.
    #[error("Transcoding {reference} failed: {source}")]
    Transcode {
        /// Reference as written in the transcript
        reference: String,
        /// What the transcoder reported
        #[source]
        source: TranscodeError,
    },

    /// Copying the source file into the media directory failed.
    #[error("Copying {reference} failed: {source}")]
    Copy {
        /// Reference as written in the transcript
        reference: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl MediaError {
    /// Returns the transcript reference this failure belongs to.
    pub fn reference(&self) -> &str {
        match self {
            MediaError::NotFound { reference }
            | MediaError::Transcode { reference, .. }
            | MediaError::Copy { reference, .. } => reference,
        }
    }
}

/// Failure of a single transcoder invocation.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The process could not be started.
    #[error("could not run {program}: {source}")]
    Spawn {
        /// Program name or path
        program: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("{} ({output})", exit_description(*code))]
    Failed {
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Combined stdout and stderr, trimmed
        output: String,
    },
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// An image could not be placed on the page.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The file could not be read or decoded.
    #[error("Cannot decode image {}: {source}", path.display())]
    Decode {
        /// Image path
        path: PathBuf,
        /// The decoder error
        #[source]
        source: printpdf::image_crate::ImageError,
    },

    /// The image decoded to zero pixels.
    #[error("Image {} has no pixels", path.display())]
    Empty {
        /// Image path
        path: PathBuf,
    },

    /// The canvas does not accept images.
    #[error("Images are not supported by this canvas ({})", path.display())]
    Unsupported {
        /// Image path
        path: PathBuf,
    },
}

/// Failure to fetch the fallback font.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The HTTP request failed or returned an error status.
    #[cfg(feature = "font-download")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an empty body.
    #[error("empty response body")]
    Empty,

    /// The downloaded font could not be written to the cache.
    #[error("cannot write font: {0}")]
    Io(#[from] io::Error),

    /// Downloading is compiled out.
    #[error("built without the font-download feature")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatPdfError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
        assert!(err.is_io());
    }

    #[test]
    fn test_invalid_input_display() {
        let err = ChatPdfError::invalid_input("/tmp/chat.rar", "expected a .zip extension");
        let display = err.to_string();
        assert!(display.contains("/tmp/chat.rar"));
        assert!(display.contains(".zip extension"));
        assert!(err.is_invalid_input());
        assert!(!err.is_io());
    }

    #[test]
    fn test_transcoder_missing_display() {
        let err = ChatPdfError::TranscoderMissing {
            program: "ffmpeg".into(),
        };
        assert!(err.to_string().contains("ffmpeg"));
        assert!(err.is_transcoder_missing());
    }

    #[test]
    fn test_font_unavailable_lists_paths() {
        let err = ChatPdfError::FontUnavailable {
            tried: vec![PathBuf::from("DejaVuSans.ttf"), PathBuf::from("/fonts/arial.ttf")],
        };
        let display = err.to_string();
        assert!(display.contains("DejaVuSans.ttf"));
        assert!(display.contains("/fonts/arial.ttf"));

        let empty = ChatPdfError::FontUnavailable { tried: vec![] };
        assert!(empty.to_string().contains("nothing"));
    }

    #[test]
    fn test_transcript_not_found() {
        let err = ChatPdfError::TranscriptNotFound {
            dir: PathBuf::from("/tmp/x"),
        };
        assert!(err.is_transcript_not_found());
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn test_save_error_source_chain() {
        use std::error::Error;
        let err = ChatPdfError::Save {
            path: PathBuf::from("out/chat_export.pdf"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("chat_export.pdf"));
    }

    #[test]
    fn test_render_constructor() {
        let err = ChatPdfError::render("bad font table");
        assert!(err.to_string().contains("bad font table"));
    }

    #[test]
    fn test_media_error_reference() {
        let err = MediaError::NotFound {
            reference: "photo.jpg".into(),
        };
        assert_eq!(err.reference(), "photo.jpg");
        assert!(err.to_string().contains("photo.jpg"));

        let err = MediaError::Transcode {
            reference: "voice.opus".into(),
            source: TranscodeError::Failed {
                code: Some(1),
                output: "Invalid data found".into(),
            },
        };
        assert_eq!(err.reference(), "voice.opus");
        assert!(err.to_string().contains("exit code 1"));
        assert!(err.to_string().contains("Invalid data found"));
    }

    #[test]
    fn test_transcode_error_chain() {
        use std::error::Error;
        let err = MediaError::Transcode {
            reference: "voice.opus".into(),
            source: TranscodeError::Spawn {
                program: "ffmpeg".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            },
        };
        let source = err.source().unwrap();
        assert!(source.to_string().contains("could not run ffmpeg"));
        assert!(source.source().is_some());

        let signalled = TranscodeError::Failed {
            code: None,
            output: String::new(),
        };
        assert!(signalled.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_embed_error_display() {
        let err = EmbedError::Empty {
            path: PathBuf::from("medias/blank.png"),
        };
        assert!(err.to_string().contains("medias/blank.png"));

        let err = EmbedError::Unsupported {
            path: PathBuf::from("a.jpg"),
        };
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_download_error_display() {
        assert_eq!(DownloadError::Empty.to_string(), "empty response body");
        let err = DownloadError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(err.to_string().contains("denied"));
    }
}
