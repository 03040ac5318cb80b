//! TTF font acquisition.
//!
//! The document needs one TTF font with Latin-1 coverage. Lookup order:
//!
//! 1. The path given explicitly by the user (nothing else is tried).
//! 2. The local cache (`DejaVuSans.ttf` next to the working directory).
//! 3. A one-time download into the cache (feature `font-download`).
//! 4. Platform fonts: Arial on Windows and macOS, DejaVu on Linux.
//!
//! When every step fails the run is aborted with
//! [`ChatPdfError::FontUnavailable`].

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{FontConfig, is_file};
use crate::error::{ChatPdfError, DownloadError, Result};

/// How the font was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    Explicit,
    Cache,
    Downloaded,
    System,
}

/// A font file ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    pub path: PathBuf,
    pub source: FontSource,
}

/// Platform font files tried after the cache and the download.
pub fn system_font_paths() -> Vec<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[r"C:\Windows\Fonts\arial.ttf"]
    } else if cfg!(target_os = "macos") {
        &[
            "/Library/Fonts/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Arial.ttf",
        ]
    } else {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        ]
    };
    candidates.iter().map(PathBuf::from).collect()
}

/// Walks the lookup chain for a [`FontConfig`].
#[derive(Debug, Clone)]
pub struct FontLocator<'a> {
    config: &'a FontConfig,
    system_paths: Vec<PathBuf>,
}

impl<'a> FontLocator<'a> {
    pub fn new(config: &'a FontConfig) -> Self {
        Self {
            config,
            system_paths: system_font_paths(),
        }
    }

    /// Replaces the platform font list.
    #[must_use]
    pub fn with_system_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.system_paths = paths;
        self
    }

    /// Returns the first usable font.
    pub fn locate(&self) -> Result<ResolvedFont> {
        if let Some(explicit) = &self.config.explicit {
            if is_file(explicit) {
                return Ok(ResolvedFont {
                    path: explicit.clone(),
                    source: FontSource::Explicit,
                });
            }
            return Err(ChatPdfError::FontUnavailable {
                tried: vec![explicit.clone()],
            });
        }

        let cache = &self.config.cache_path;
        let mut tried = vec![cache.clone()];

        if is_file(cache) {
            return Ok(ResolvedFont {
                path: cache.clone(),
                source: FontSource::Cache,
            });
        }

        if let Some(url) = &self.config.download_url {
            info!("Downloading font {} (only happens once)...", file_label(cache));
            match download(url, cache) {
                Ok(()) if is_file(cache) => {
                    info!("Font downloaded to {}", cache.display());
                    return Ok(ResolvedFont {
                        path: cache.clone(),
                        source: FontSource::Downloaded,
                    });
                }
                Ok(()) => warn!("Font download produced no file at {}", cache.display()),
                Err(e) => warn!("Could not download {}: {e}", file_label(cache)),
            }
        }

        for candidate in &self.system_paths {
            if is_file(candidate) {
                info!("Using system font {}", candidate.display());
                return Ok(ResolvedFont {
                    path: candidate.clone(),
                    source: FontSource::System,
                });
            }
            tried.push(candidate.clone());
        }

        Err(ChatPdfError::FontUnavailable { tried })
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(feature = "font-download")]
fn download(url: &str, dest: &Path) -> std::result::Result<(), DownloadError> {
    let response =
        reqwest::blocking::get(url).and_then(reqwest::blocking::Response::error_for_status)?;
    let bytes = response.bytes()?;
    if bytes.is_empty() {
        return Err(DownloadError::Empty);
    }
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, &bytes)?;
    Ok(())
}

#[cfg(not(feature = "font-download"))]
fn download(_url: &str, _dest: &Path) -> std::result::Result<(), DownloadError> {
    Err(DownloadError::Disabled)
}
