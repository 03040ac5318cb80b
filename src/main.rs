//! # chatpdf CLI
//!
//! Command-line interface for the chatpdf library.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatpdf::ChatPdfError;
use chatpdf::archive;
use chatpdf::cli::Args;
use chatpdf::font::FontLocator;
use chatpdf::layout::{LayoutEngine, PdfCanvas};
use chatpdf::media::{Ffmpeg, MediaResolver, Transcoder};
use chatpdf::parser::TranscriptParser;

fn main() {
    if let Err(e) = run() {
        println!("❌ Error: {}", e);
        if e.is_transcoder_missing() {
            println!("{}", install_hint());
        }
        process::exit(1);
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();
}

fn run() -> Result<(), ChatPdfError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    let quiet = args.quiet;
    init_tracing(quiet);
    let config = args.into_config();

    let ffmpeg = Ffmpeg::new(&config.ffmpeg);
    if !ffmpeg.is_available() {
        return Err(ChatPdfError::TranscoderMissing {
            program: config.ffmpeg.clone(),
        });
    }
    archive::validate_input(&config.archive)?;

    if !quiet {
        println!("📦 chatpdf v{}", env!("CARGO_PKG_VERSION"));
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("📂 Input:   {}", config.archive.display());
        println!("💾 Output:  {}", config.output_dir.display());
        if let Some(me) = &config.layout.local_participant {
            println!("👤 Me:      {}", me);
        }
        println!();
    }

    // Step 1: Extract
    let scratch = tempfile::tempdir()?;
    step(quiet, "📤 Extracting archive...");
    let written = archive::extract(&config.archive, scratch.path())?;
    let transcript = archive::find_transcript(scratch.path())?;
    detail(quiet, format!("{} files, transcript: {}", written, file_name(&transcript)));

    // Step 2: Prepare output
    config.prepare_output()?;

    // Step 3: Font
    let font = FontLocator::new(&config.font).locate()?;
    detail(quiet, format!("Font: {}", font.path.display()));

    // Step 4: Parse
    step(quiet, "⏳ Parsing transcript...");
    let parser = TranscriptParser::with_config(&config.parser)?;
    let messages = parser.parse_file(&transcript)?;
    let with_media = messages.iter().filter(|m| m.has_media()).count();
    detail(
        quiet,
        format!("Found {} messages ({} with attachments)", messages.len(), with_media),
    );

    // Step 5: Media
    step(quiet, "🎞️  Processing media...");
    let resolver = MediaResolver::new(&ffmpeg, config.media_dir());
    let report = resolver.resolve(&messages, scratch.path())?;
    detail(
        quiet,
        format!(
            "{} resolved, {} missing, {} converted, {} copied, {} reused",
            report.map.len(),
            report.unresolved().count(),
            report.transcoded,
            report.copied,
            report.reused
        ),
    );

    // Step 6: Render
    step(quiet, "🖨️  Rendering PDF...");
    let title = config.layout.title.clone().unwrap_or_else(|| config.archive_name());
    let mut canvas = PdfCanvas::new(&title, &font.path)?;
    let engine = LayoutEngine::new(&config.layout, config.media_dir());
    let summary = engine.render(&mut canvas, &messages, &report.map);

    let document = config.document_path();
    canvas.save(&document)?;
    let absolute = fs::canonicalize(&document).unwrap_or(document);

    println!();
    println!("✅ Done! PDF saved to {}", absolute.display());

    if !quiet {
        println!();
        println!("📊 Summary:");
        println!("   Messages:   {}", summary.messages);
        println!(
            "   Media:      {} resolved, {} missing",
            report.map.len(),
            report.unresolved().count()
        );
        println!("   Converted:  {} audio files", report.transcoded);
        println!("   Pages:      {}", summary.pages);
        println!("   Time:       {:.2}s", total_start.elapsed().as_secs_f64());
    }

    Ok(())
}

fn step(quiet: bool, line: &str) {
    if !quiet {
        println!("{}", line);
    }
}

fn detail(quiet: bool, line: String) {
    if !quiet {
        println!("   {}", line);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn install_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "   Install it with: brew install ffmpeg"
    } else if cfg!(target_os = "windows") {
        "   Download it from https://ffmpeg.org/download.html and add its bin folder to PATH"
    } else {
        "   Install it with: sudo apt install ffmpeg  (Debian/Ubuntu)\n   or: sudo dnf install ffmpeg  (Fedora)"
    }
}
