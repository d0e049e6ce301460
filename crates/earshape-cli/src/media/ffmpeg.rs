//! ffmpeg-backed media adapter.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use log::debug;

use super::{has_video_stream, AdapterError, Extraction, MediaAdapter, Stage};

/// Environment variable overriding the ffmpeg binary.
pub const FFMPEG_ENV: &str = "EARSHAPE_FFMPEG";

/// Configuration for the ffmpeg adapter.
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// Binary to invoke.
    pub binary: PathBuf,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegConfig {
    /// Resolves the binary from `explicit`, then `EARSHAPE_FFMPEG`, then `PATH`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, AdapterError> {
        Ok(Self {
            binary: resolve_binary(explicit)?,
        })
    }
}

/// Best-effort resolver for a usable ffmpeg binary.
pub fn resolve_binary(explicit: Option<&Path>) -> Result<PathBuf, AdapterError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(bin) = env::var_os(FFMPEG_ENV) {
        if !bin.is_empty() {
            return Ok(PathBuf::from(bin));
        }
    }

    which::which("ffmpeg").map_err(|e| AdapterError::BinaryNotFound(e.to_string()))
}

/// Arguments that normalize `input` to 2-channel 16-bit PCM at `output`.
pub fn extract_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
    args.extend(["-ac", "2", "-sample_fmt", "s16"].map(OsString::from));
    args.push(output.into());
    args
}

/// Arguments that copy the first video stream of `input` and take audio from `wav`.
pub fn remux_args(input: &Path, wav: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
    args.push("-i".into());
    args.push(wav.into());
    args.extend(["-c:v", "copy", "-map", "0:v:0", "-map", "1:a:0"].map(OsString::from));
    args.push(output.into());
    args
}

/// Runs ffmpeg as a blocking subprocess with captured output.
#[derive(Debug, Clone, Default)]
pub struct FfmpegAdapter {
    config: FfmpegConfig,
}

impl FfmpegAdapter {
    pub fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FfmpegConfig {
        &self.config
    }

    /// First line of `ffmpeg -version`.
    pub fn version(&self) -> Result<String, AdapterError> {
        let output = self.run(Stage::Probe, &[OsString::from("-version")])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or("").trim().to_string())
    }

    fn run(&self, stage: Stage, args: &[OsString]) -> Result<Output, AdapterError> {
        let binary = &self.config.binary;
        debug!("{}: {} {:?}", stage, binary.display(), args);

        let mut cmd = Command::new(binary);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().map_err(|source| AdapterError::Spawn {
            stage,
            binary: binary.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(AdapterError::NonZeroExit {
                stage,
                code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output)
    }
}

impl MediaAdapter for FfmpegAdapter {
    fn extract_pcm(&self, input: &Path, wav_out: &Path) -> Result<Extraction, AdapterError> {
        let output = self.run(Stage::Extract, &extract_args(input, wav_out))?;
        if !wav_out.exists() {
            return Err(AdapterError::OutputMissing {
                stage: Stage::Extract,
                path: wav_out.to_path_buf(),
            });
        }

        // ffmpeg prints stream info on stderr
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Ok(Extraction {
            wav_path: wav_out.to_path_buf(),
            has_video: has_video_stream(&stderr),
            stderr,
        })
    }

    fn remux(&self, input: &Path, wav: &Path, output: &Path) -> Result<(), AdapterError> {
        self.run(Stage::Remux, &remux_args(input, wav, output))?;
        if !output.exists() {
            return Err(AdapterError::OutputMissing {
                stage: Stage::Remux,
                path: output.to_path_buf(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_extract_args() {
        let args = extract_args(Path::new("in.mp4"), Path::new("out/originalAudio.wav"));
        assert_eq!(
            strings(&args),
            vec![
                "-y",
                "-i",
                "in.mp4",
                "-ac",
                "2",
                "-sample_fmt",
                "s16",
                "out/originalAudio.wav"
            ]
        );
    }

    #[test]
    fn test_remux_args() {
        let args = remux_args(
            Path::new("in.mp4"),
            Path::new("out/convertedAudio.wav"),
            Path::new("out/convertedMedia.mp4"),
        );
        assert_eq!(
            strings(&args),
            vec![
                "-y",
                "-i",
                "in.mp4",
                "-i",
                "out/convertedAudio.wav",
                "-c:v",
                "copy",
                "-map",
                "0:v:0",
                "-map",
                "1:a:0",
                "out/convertedMedia.mp4"
            ]
        );
    }

    #[test]
    fn test_explicit_binary_wins() {
        let path = resolve_binary(Some(Path::new("/opt/ffmpeg/bin/ffmpeg"))).unwrap();
        assert_eq!(path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let adapter = FfmpegAdapter::new(FfmpegConfig {
            binary: PathBuf::from("/nonexistent/earshape-ffmpeg"),
        });
        let err = adapter.version().unwrap_err();
        assert!(matches!(err, AdapterError::Spawn { stage: Stage::Probe, .. }));
    }
}
