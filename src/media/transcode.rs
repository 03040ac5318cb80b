//! External audio transcoding.
//!
//! WhatsApp voice notes are Opus files, which most PDF viewers will not hand
//! to a player. They are converted to MP3 with `ffmpeg`. The [`Transcoder`]
//! trait is the seam between the resolver and the external process.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::TranscodeError;

/// Extension of sources that must be transcoded (compared case-insensitively).
pub const TRANSCODE_FROM: &str = "opus";

/// Extension given to transcoded files.
pub const TRANSCODE_TO: &str = "mp3";

/// Converts one audio file into another format.
pub trait Transcoder {
    /// Program name for diagnostics.
    fn name(&self) -> &str;

    /// Checks whether the transcoder can be executed at all.
    fn is_available(&self) -> bool;

    /// Converts `input` into `output`, overwriting it if present.
    ///
    /// On failure the error carries the exit status and whatever the process
    /// printed, for the log.
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// Transcoder backed by the `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: String,
}

impl Ffmpeg {
    /// Uses `program` (a name on `PATH` or a full path).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder for Ffmpeg {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        debug!(
            program = %self.program,
            input = %input.display(),
            output = %output.display(),
            "transcoding"
        );
        let result = Command::new(&self.program)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg(output)
            .output()
            .map_err(|source| TranscodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if result.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&result.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&result.stderr));
        Err(TranscodeError::Failed {
            code: result.status.code(),
            output: combined.trim().to_string(),
        })
    }
}

/// Returns `true` if a file with this name must go through the transcoder.
pub fn needs_transcoding(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TRANSCODE_FROM))
}

/// Output name for a transcoded reference: the extension is swapped for
/// [`TRANSCODE_TO`] (`voice.opus` → `voice.mp3`).
pub fn transcoded_name(reference: &str) -> String {
    let path = Path::new(reference);
    let has_source_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TRANSCODE_FROM));
    if has_source_ext {
        let stem_len = reference.len() - TRANSCODE_FROM.len() - 1;
        format!("{}.{TRANSCODE_TO}", &reference[..stem_len])
    } else {
        format!("{reference}.{TRANSCODE_TO}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_transcoding() {
        assert!(needs_transcoding(Path::new("/tmp/voice.opus")));
        assert!(needs_transcoding(Path::new("VOICE.OPUS")));
        assert!(!needs_transcoding(Path::new("song.mp3")));
        assert!(!needs_transcoding(Path::new("opus")));
    }

    #[test]
    fn test_transcoded_name() {
        assert_eq!(transcoded_name("voice.opus"), "voice.mp3");
        assert_eq!(transcoded_name("PTT-2023.OPUS"), "PTT-2023.mp3");
        assert_eq!(transcoded_name("a.b.opus"), "a.b.mp3");
        assert_eq!(transcoded_name("voice"), "voice.mp3");
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let ffmpeg = Ffmpeg::new("definitely-not-a-real-transcoder-binary");
        assert!(!ffmpeg.is_available());
        assert_eq!(ffmpeg.name(), "definitely-not-a-real-transcoder-binary");
    }

    #[test]
    fn test_missing_program_transcode_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = Ffmpeg::new("definitely-not-a-real-transcoder-binary");
        let result = ffmpeg.transcode(&dir.path().join("a.opus"), &dir.path().join("a.mp3"));
        assert!(matches!(result, Err(TranscodeError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = Ffmpeg::new("false");
        match ffmpeg.transcode(&dir.path().join("a.opus"), &dir.path().join("a.mp3")) {
            Err(TranscodeError::Failed { code, .. }) => assert_eq!(code, Some(1)),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
