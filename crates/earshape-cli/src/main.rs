//! Earshape CLI - audiogram-based spectral correction of media audio
//!
//! This binary extracts the audio of a media file, corrects each channel
//! against a per-ear audiogram, and writes the corrected audio (re-muxed onto
//! the source video when there is one) plus diagnostic plots.

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use earshape_cli::commands::{self, correct::CorrectOptions, curve::DEFAULT_SAMPLE_RATE};
use earshape_dsp::{CorrectionConfig, WindowConfig, DEFAULT_GAIN_BOOST};

/// Earshape - audiogram-based audio correction
#[derive(Parser)]
#[command(name = "earshape")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct the audio of a media file against an audiogram
    Correct {
        /// Input media file (anything ffmpeg can decode)
        #[arg(short, long)]
        input: String,

        /// Output folder for the corrected audio and diagnostics
        #[arg(short, long)]
        out_dir: String,

        /// Audiogram JSON: [[[freq_hz, loss_db], ...], [[freq_hz, loss_db], ...]]
        #[arg(short, long)]
        audiogram: String,

        /// Also render an animation of the before/after spectra
        #[arg(long)]
        anim: bool,

        /// Reuse an existing output folder without asking
        #[arg(short, long)]
        yes: bool,

        /// Flat multiplier applied to every frequency bin
        #[arg(long, default_value_t = DEFAULT_GAIN_BOOST)]
        gain_boost: f64,

        /// Animation window length in milliseconds
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
        window_ms: u32,

        /// ffmpeg binary (default: $EARSHAPE_FFMPEG, then PATH)
        #[arg(long)]
        ffmpeg: Option<String>,
    },

    /// Render an audiogram's attenuation curves to a PNG
    Curve {
        /// Audiogram JSON file
        #[arg(short, long)]
        audiogram: String,

        /// Sampling rate the curves are padded to
        #[arg(short = 'r', long, default_value_t = DEFAULT_SAMPLE_RATE, value_parser = clap::value_parser!(u32).range(1..))]
        sample_rate: u32,

        /// Output PNG path
        #[arg(short, long, default_value = "audiogram.png")]
        output: String,
    },

    /// Check system dependencies
    Doctor {
        /// ffmpeg binary to check
        #[arg(long)]
        ffmpeg: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Correct {
            input,
            out_dir,
            audiogram,
            anim,
            yes,
            gain_boost,
            window_ms,
            ffmpeg,
        } => {
            let options = CorrectOptions {
                input: PathBuf::from(input),
                out_dir: PathBuf::from(out_dir),
                audiogram: PathBuf::from(audiogram),
                anim,
                assume_yes: yes,
                correction: CorrectionConfig { gain_boost },
                window: WindowConfig {
                    window_seconds: window_ms as f64 / 1000.0,
                },
            };
            commands::correct::run(&options, ffmpeg.as_deref().map(Path::new))
        }
        Commands::Curve {
            audiogram,
            sample_rate,
            output,
        } => commands::curve::run(Path::new(&audiogram), sample_rate, Path::new(&output)),
        Commands::Doctor { ffmpeg } => commands::doctor::run(ffmpeg.as_deref().map(Path::new)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(commands::exit_code_for(&e))
        }
    }
}
