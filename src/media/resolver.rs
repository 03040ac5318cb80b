//! Matching transcript attachment references to extracted files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::MediaMap;
use super::index::AvailableFileIndex;
use super::transcode::{Transcoder, needs_transcoding, transcoded_name};
use crate::Message;
use crate::error::{MediaError, Result};

/// What happened during a resolution pass.
#[derive(Debug, Default)]
pub struct ResolveReport {
    /// Reference → output file name.
    pub map: MediaMap,
    /// Per-reference failures, already logged.
    pub failures: Vec<MediaError>,
    /// Transcoder invocations that succeeded.
    pub transcoded: usize,
    /// Files copied byte-for-byte.
    pub copied: usize,
    /// Destinations that already existed and were left alone.
    pub reused: usize,
}

impl ResolveReport {
    /// References for which no source file was found.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().filter_map(|f| match f {
            MediaError::NotFound { reference } => Some(reference.as_str()),
            _ => None,
        })
    }
}

/// Resolves attachment references and fills the output media directory.
///
/// Each distinct reference is handled once: the source is located through an
/// [`AvailableFileIndex`], Opus audio is converted with the [`Transcoder`],
/// anything else is copied. Existing destinations are never touched again,
/// so running a second time over the same media directory is a no-op.
pub struct MediaResolver<'a, T: Transcoder + ?Sized> {
    transcoder: &'a T,
    media_dir: PathBuf,
}

impl<'a, T: Transcoder + ?Sized> MediaResolver<'a, T> {
    /// Creates a resolver writing into `media_dir`.
    pub fn new(transcoder: &'a T, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            transcoder,
            media_dir: media_dir.into(),
        }
    }

    /// Output media directory.
    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Indexes `source_root` and resolves every attachment in `messages`.
    ///
    /// Only directory-level problems (walking the source tree, creating the
    /// media directory) are returned as errors.
    pub fn resolve(&self, messages: &[Message], source_root: &Path) -> Result<ResolveReport> {
        let index = AvailableFileIndex::build(source_root)?;
        self.resolve_with_index(messages, &index)
    }

    /// Resolves against a prebuilt index.
    pub fn resolve_with_index(
        &self,
        messages: &[Message],
        index: &AvailableFileIndex,
    ) -> Result<ResolveReport> {
        fs::create_dir_all(&self.media_dir)?;

        let mut report = ResolveReport::default();
        let mut seen = HashSet::new();

        for msg in messages.iter().filter(|m| m.has_media()) {
            let reference = msg.media_reference.as_str();
            if !seen.insert(reference) {
                continue;
            }

            let Some(source) = index.find(reference) else {
                warn!("Media not found: {reference}");
                report.failures.push(MediaError::NotFound {
                    reference: reference.to_string(),
                });
                continue;
            };

            let output_name = if needs_transcoding(source) {
                self.transcode(reference, source, &mut report)
            } else {
                self.copy(reference, source, &mut report)
            };
            report.map.insert(reference, output_name);
        }

        Ok(report)
    }

    fn transcode(&self, reference: &str, source: &Path, report: &mut ResolveReport) -> String {
        let name = output_file_name(&transcoded_name(reference));
        let destination = self.media_dir.join(&name);

        if destination.exists() {
            report.reused += 1;
            return name;
        }

        info!("Converting {reference} -> {name}");
        match self.transcoder.transcode(source, &destination) {
            Ok(()) => report.transcoded += 1,
            Err(source) => {
                warn!("{} error: {source}", self.transcoder.name());
                report.failures.push(MediaError::Transcode {
                    reference: reference.to_string(),
                    source,
                });
            }
        }
        name
    }

    fn copy(&self, reference: &str, source: &Path, report: &mut ResolveReport) -> String {
        let name = output_file_name(reference);
        let destination = self.media_dir.join(&name);

        if destination.exists() {
            report.reused += 1;
            return name;
        }

        info!("Copying {reference} to {}", self.media_dir.display());
        match fs::copy(source, &destination) {
            Ok(_) => report.copied += 1,
            Err(source) => {
                warn!("Error copying media {reference}: {source}");
                report.failures.push(MediaError::Copy {
                    reference: reference.to_string(),
                    source,
                });
            }
        }
        name
    }
}

/// Keeps only the final path component so a reference can never place a
/// file outside the media directory.
fn output_file_name(reference: &str) -> String {
    let last = reference
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(reference);
    if last.is_empty() || last == ".." || last == "." {
        reference.replace(['/', '\\'], "_")
    } else {
        last.to_string()
    }
}
