//! Correct command implementation
//!
//! Normalizes the input media to stereo PCM, corrects it against an
//! audiogram, and writes the corrected audio plus its diagnostics.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use earshape_dsp::{CorrectionConfig, CorrectionPipeline, SpectrumWindows, WindowConfig};
use earshape_spec::Audiogram;
use log::info;

use super::{load_audiogram, ConfigError, EXIT_DECLINED};
use crate::media::{
    converted_media_path, FfmpegAdapter, FfmpegConfig, MediaAdapter, ORIGINAL_AUDIO,
};
use crate::prompt::{prepare_output_dir, OutputDir};
use crate::render::{audiogram_png, encode_gif, frame_delay};
use crate::report::{blake3_hex, RunReport, REPORT_FILE, REPORT_VERSION};
use crate::wav;

/// File name of the corrected audio.
pub const CONVERTED_AUDIO: &str = "convertedAudio.wav";
/// File name of the curve plot.
pub const AUDIOGRAM_PLOT: &str = "audiogram.png";
/// File name of the spectra animation.
pub const ANIMATION: &str = "anim.gif";

/// Inputs of one correction run.
#[derive(Debug, Clone)]
pub struct CorrectOptions {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub audiogram: PathBuf,
    /// Render the before/after spectra animation.
    pub anim: bool,
    /// Reuse an existing output folder without asking.
    pub assume_yes: bool,
    pub correction: CorrectionConfig,
    pub window: WindowConfig,
}

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectOutcome {
    Completed(RunReport),
    /// The output folder existed and the user declined to reuse it.
    Declined,
}

/// Run the correct command with ffmpeg and the process's stdin/stdout.
///
/// # Returns
/// Exit code: 0 on success, 2 if the overwrite prompt was declined
pub fn run(options: &CorrectOptions, ffmpeg: Option<&Path>) -> Result<ExitCode> {
    // A bad audiogram is reported as such even when ffmpeg is missing
    let checked = check(options)?;
    let adapter = FfmpegAdapter::new(FfmpegConfig::resolve(ffmpeg)?);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    match proceed(options, checked, &adapter, &mut input, &mut output)? {
        CorrectOutcome::Completed(_) => Ok(ExitCode::SUCCESS),
        CorrectOutcome::Declined => Ok(ExitCode::from(EXIT_DECLINED)),
    }
}

/// Runs a correction with an explicit adapter and prompt streams.
pub fn execute<A, R, W>(
    options: &CorrectOptions,
    adapter: &A,
    prompt_in: &mut R,
    prompt_out: &mut W,
) -> Result<CorrectOutcome>
where
    A: MediaAdapter + ?Sized,
    R: BufRead,
    W: Write,
{
    let checked = check(options)?;
    proceed(options, checked, adapter, prompt_in, prompt_out)
}

/// Inputs validated before the output folder or the transcoder is touched.
struct Checked {
    audiogram: Audiogram,
    audiogram_hash: String,
    pipeline: CorrectionPipeline,
}

fn check(options: &CorrectOptions) -> Result<Checked> {
    let (audiogram, audiogram_hash) = load_audiogram(&options.audiogram)?;
    println!(
        "{} Loaded audiogram {}",
        "ok".green(),
        options.audiogram.display()
    );
    let pipeline = CorrectionPipeline::new(options.correction)?;
    if options.anim {
        // Reject a bad window length before any output is written
        options.window.validate()?;
    }
    if !options.input.exists() {
        return Err(ConfigError::InputNotFound(options.input.clone()).into());
    }

    Ok(Checked {
        audiogram,
        audiogram_hash,
        pipeline,
    })
}

fn proceed<A, R, W>(
    options: &CorrectOptions,
    checked: Checked,
    adapter: &A,
    prompt_in: &mut R,
    prompt_out: &mut W,
) -> Result<CorrectOutcome>
where
    A: MediaAdapter + ?Sized,
    R: BufRead,
    W: Write,
{
    let Checked {
        audiogram,
        audiogram_hash,
        mut pipeline,
    } = checked;

    let out_dir = options.out_dir.as_path();
    let state = prepare_output_dir(out_dir, options.assume_yes, prompt_in, prompt_out)
        .with_context(|| format!("Failed to prepare output folder: {}", out_dir.display()))?;
    if !state.proceed() {
        println!("{} Output folder left untouched, aborting", "!!".yellow());
        return Ok(CorrectOutcome::Declined);
    }
    if state == OutputDir::Created {
        info!("created output folder {}", out_dir.display());
    }

    let mut artifacts = Vec::new();

    // Normalize the input to 16-bit stereo
    let extraction = adapter
        .extract_pcm(&options.input, &out_dir.join(ORIGINAL_AUDIO))
        .with_context(|| format!("Failed to extract audio from {}", options.input.display()))?;
    artifacts.push(ORIGINAL_AUDIO.to_string());
    let audio = wav::read_stereo(&extraction.wav_path)?;
    println!(
        "{} Extracted {} frames at {} Hz ({:.2} s{})",
        "ok".green(),
        audio.frames(),
        audio.sample_rate(),
        audio.duration_seconds(),
        if extraction.has_video { ", video" } else { "" }
    );

    let output = pipeline
        .run(&audio, &audiogram)
        .context("Spectral correction failed")?;

    let converted = out_dir.join(CONVERTED_AUDIO);
    wav::write_stereo(&converted, audio.sample_rate(), &output.pcm.samples)?;
    artifacts.push(CONVERTED_AUDIO.to_string());
    println!("{} Wrote {}", "ok".green(), converted.display());
    if output.pcm.saturated > 0 {
        println!(
            "  {} {} samples clipped to the 16-bit range",
            "!!".yellow(),
            output.pcm.saturated
        );
    }

    let plot = out_dir.join(AUDIOGRAM_PLOT);
    fs::write(&plot, audiogram_png(&output.curves, &output.axis))
        .with_context(|| format!("Failed to write plot: {}", plot.display()))?;
    artifacts.push(AUDIOGRAM_PLOT.to_string());
    println!("{} Wrote {}", "ok".green(), plot.display());

    if extraction.has_video {
        let media = converted_media_path(out_dir, &options.input);
        adapter
            .remux(&options.input, &converted, &media)
            .with_context(|| format!("Failed to re-mux {}", media.display()))?;
        artifacts.push(file_name(&media));
        println!("{} Wrote {}", "ok".green(), media.display());
    }

    let mut animation_frames = None;
    if options.anim {
        let windows = SpectrumWindows::new(&audio, &output, options.window)?;
        let mut gif_bytes: Vec<u8> = Vec::new();
        let frames = encode_gif(
            windows,
            frame_delay(options.window.window_seconds),
            &mut gif_bytes,
        )?;
        if frames == 0 {
            println!(
                "  {} Signal is shorter than one {} s window, no animation written",
                "!!".yellow(),
                options.window.window_seconds
            );
        } else {
            let path = out_dir.join(ANIMATION);
            fs::write(&path, &gif_bytes)
                .with_context(|| format!("Failed to write animation: {}", path.display()))?;
            artifacts.push(ANIMATION.to_string());
            println!("{} Wrote {} ({} frames)", "ok".green(), path.display(), frames);
        }
        animation_frames = Some(frames);
    }

    artifacts.push(REPORT_FILE.to_string());
    let report = RunReport {
        report_version: REPORT_VERSION,
        input: options.input.clone(),
        audiogram_hash,
        sample_rate: audio.sample_rate(),
        frames: audio.frames(),
        has_video: extraction.has_video,
        gain_boost: pipeline.config().gain_boost,
        saturated_samples: output.pcm.saturated,
        pcm_hash: blake3_hex(&output.pcm.to_le_bytes()),
        animation_frames,
        artifacts,
    };
    let report_path = report.write(out_dir)?;
    println!("{} Wrote {}", "ok".green(), report_path.display());

    Ok(CorrectOutcome::Completed(report))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
