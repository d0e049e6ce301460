//! Media decoding and re-muxing.
//!
//! The correction pipeline only ever sees 16-bit stereo WAV files. Everything
//! that touches other containers goes through [`MediaAdapter`], which the
//! `correct` command drives and tests replace with an in-process fake.

pub mod ffmpeg;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use ffmpeg::{FfmpegAdapter, FfmpegConfig};

/// Substring in the decoder's diagnostics announcing a video stream.
pub const VIDEO_MARKER: &str = " Video: ";

/// File name of the normalized PCM extracted from the input.
pub const ORIGINAL_AUDIO: &str = "originalAudio.wav";

/// File name stem of the re-muxed media file.
pub const CONVERTED_MEDIA_STEM: &str = "convertedMedia";

/// Which adapter call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Remux,
    Probe,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => write!(f, "audio extraction"),
            Stage::Remux => write!(f, "re-mux"),
            Stage::Probe => write!(f, "version probe"),
        }
    }
}

/// Errors raised by a media adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// No transcoder binary could be located.
    #[error("ffmpeg not found: {0} (pass --ffmpeg or set EARSHAPE_FFMPEG)")]
    BinaryNotFound(String),

    /// The transcoder could not be started.
    #[error("failed to spawn '{}' for {stage}: {source}", binary.display())]
    Spawn {
        stage: Stage,
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The transcoder ran and exited non-zero. Both captured streams are shown.
    #[error("{stage} exited with code {code}\n{stderr}{}", stdout_section(.stdout))]
    NonZeroExit {
        stage: Stage,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The transcoder exited cleanly without producing its output.
    #[error("{stage} finished but {} was not written", path.display())]
    OutputMissing { stage: Stage, path: PathBuf },
}

fn stdout_section(stdout: &str) -> String {
    if stdout.trim().is_empty() {
        String::new()
    } else {
        format!("\nstdout:\n{}", stdout)
    }
}

/// Result of normalizing the input to stereo PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Where the 16-bit stereo WAV was written.
    pub wav_path: PathBuf,
    /// Whether the source carried a video stream worth re-muxing.
    pub has_video: bool,
    /// Captured diagnostics of the decoder.
    pub stderr: String,
}

/// Decode-to-PCM and mux-back operations.
pub trait MediaAdapter {
    /// Decodes `input` to a two-channel, 16-bit WAV at `wav_out`.
    fn extract_pcm(&self, input: &Path, wav_out: &Path) -> Result<Extraction, AdapterError>;

    /// Writes `output`: the video of `input` with the audio of `wav`.
    fn remux(&self, input: &Path, wav: &Path, output: &Path) -> Result<(), AdapterError>;
}

/// True if decoder diagnostics mention a video stream.
pub fn has_video_stream(diagnostics: &str) -> bool {
    diagnostics.contains(VIDEO_MARKER)
}

/// Path of the re-muxed file: `convertedMedia` plus the input's extension.
pub fn converted_media_path(out_dir: &Path, input: &Path) -> PathBuf {
    let name = match input.extension() {
        Some(ext) => format!("{}.{}", CONVERTED_MEDIA_STEM, ext.to_string_lossy()),
        None => CONVERTED_MEDIA_STEM.to_string(),
    };
    out_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_zero_exit_shows_both_streams() {
        let err = AdapterError::NonZeroExit {
            stage: Stage::Remux,
            code: 1,
            stdout: "progress=end".into(),
            stderr: "Output file is empty".into(),
        };
        let message = err.to_string();
        assert!(message.starts_with("re-mux exited with code 1\nOutput file is empty"));
        assert!(message.contains("stdout:\nprogress=end"));

        let quiet = AdapterError::NonZeroExit {
            stage: Stage::Extract,
            code: 1,
            stdout: String::new(),
            stderr: "bad input".into(),
        };
        assert_eq!(quiet.to_string(), "audio extraction exited with code 1\nbad input");
    }

    #[test]
    fn test_video_marker() {
        let stderr = "  Stream #0:0(und): Video: h264 (High), yuv420p, 1920x1080\n  Stream #0:1: Audio: aac";
        assert!(has_video_stream(stderr));
        assert!(!has_video_stream("  Stream #0:0: Audio: mp3, 44100 Hz, stereo"));
        // The marker needs the surrounding spaces
        assert!(!has_video_stream("Video:h264"));
    }

    #[test]
    fn test_converted_media_path() {
        let out = Path::new("out");
        assert_eq!(
            converted_media_path(out, Path::new("clips/talk.mkv")),
            Path::new("out/convertedMedia.mkv")
        );
        assert_eq!(
            converted_media_path(out, Path::new("clips/raw")),
            Path::new("out/convertedMedia")
        );
    }
}
