//! Command-line interface definition using clap.
//!
//! [`Args`] maps one-to-one onto [`Config`]; see [`Args::into_config`].

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, DEFAULT_FONT_CACHE, DEFAULT_FONT_URL, FontConfig, LayoutConfig};

/// Render an exported WhatsApp chat (.zip) as a chat-style PDF with linked
/// media.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatpdf")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatpdf \"WhatsApp Chat with Ana.zip\"
    chatpdf chat.zip --me Glauco -o exports/ana
    chatpdf chat.zip --font /usr/share/fonts/TTF/DejaVuSans.ttf --keep-output")]
pub struct Args {
    /// Path to the exported .zip archive
    pub archive: PathBuf,

    /// Output directory (receives chat_export.pdf and medias/)
    #[arg(short, long, default_value = "output", value_name = "DIR")]
    pub output: PathBuf,

    /// Your name as it appears in the chat; your messages go on the right
    #[arg(long, value_name = "NAME")]
    pub me: Option<String>,

    /// ffmpeg executable used to convert voice notes
    #[arg(long, default_value = "ffmpeg", value_name = "BIN")]
    pub ffmpeg: String,

    /// TTF font to embed (skips the download and system lookup)
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Where to download the fallback font from
    #[arg(long, default_value = DEFAULT_FONT_URL, value_name = "URL")]
    pub font_url: String,

    /// Keep the previous PDF and media folder (reuses converted audio)
    #[arg(long)]
    pub keep_output: bool,

    /// Omit the title and note at the top of the first page
    #[arg(long)]
    pub no_header: bool,

    /// Only print warnings and the final result
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the run configuration.
    pub fn into_config(self) -> Config {
        let mut layout = LayoutConfig::new().with_note(!self.no_header);
        if !self.no_header {
            let name = self
                .archive
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            layout = layout.with_title(format!("WhatsApp export: {name}"));
        }
        if let Some(me) = self.me {
            layout = layout.with_local_participant(me);
        }

        let font = FontConfig {
            explicit: self.font,
            cache_path: PathBuf::from(DEFAULT_FONT_CACHE),
            download_url: Some(self.font_url).filter(|u| !u.is_empty()),
        };

        Config::new(self.archive)
            .with_output_dir(self.output)
            .with_ffmpeg(self.ffmpeg)
            .with_clean_output(!self.keep_output)
            .with_font(font)
            .with_layout(layout)
    }
}
