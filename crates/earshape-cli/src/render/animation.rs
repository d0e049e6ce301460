//! Animated before/after spectra.
//!
//! Each [`WindowFrame`] becomes one GIF frame: original and corrected dB
//! spectra of both ears over `[0, rate/2]`, with a progress bar underneath.

use std::io::Write;

use anyhow::{Context, Result};
use earshape_dsp::{SpectrumWindows, WindowFrame};
use earshape_spec::Ear;
use log::debug;

use super::canvas::{Canvas, Plot, Rgb, Stroke, BACKGROUND_COLOR, FRAME_COLOR};

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 360;
const MARGIN: i64 = 16;
const GRID_DIVISIONS: u32 = 11;

/// Visible dB range.
pub const DB_FLOOR: f64 = -110.0;
pub const DB_CEILING: f64 = 0.0;

pub const ORIGINAL_LEFT: Rgb = [0, 0, 255];
pub const CORRECTED_LEFT: Rgb = [173, 216, 230];
pub const ORIGINAL_RIGHT: Rgb = [255, 0, 0];
pub const CORRECTED_RIGHT: Rgb = [240, 128, 128];

/// NeuQuant sampling factor for palette reduction (1 best, 30 fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Draws one window's spectra.
pub fn render_frame(frame: &WindowFrame, sample_rate: u32) -> Canvas {
    let mut canvas = Canvas::new(FRAME_WIDTH, FRAME_HEIGHT, BACKGROUND_COLOR);
    let nyquist = sample_rate as f64 / 2.0;
    let plot = Plot::new(&canvas, MARGIN, (0.0, nyquist), (DB_FLOOR, DB_CEILING));
    plot.draw_axes(&mut canvas, GRID_DIVISIONS);

    let layers: [(&[f64], Rgb); 4] = [
        (frame.original(Ear::Left), ORIGINAL_LEFT),
        (frame.corrected(Ear::Left), CORRECTED_LEFT),
        (frame.original(Ear::Right), ORIGINAL_RIGHT),
        (frame.corrected(Ear::Right), CORRECTED_RIGHT),
    ];
    for (db, color) in layers {
        let points = frame.axis.iter().zip(db.iter().copied());
        plot.draw_series(&mut canvas, points, color, Stroke::Solid);
    }

    // Progress bar in the bottom margin
    let (left, _, right, bottom) = plot.area;
    let filled = left + ((right - left) as f64 * frame.progress.clamp(0.0, 1.0)).round() as i64;
    canvas.fill_rect(left..filled + 1, bottom + 4..bottom + 10, FRAME_COLOR);

    canvas
}

/// GIF frame delay in hundredths of a second for windows of `window_seconds`.
pub fn frame_delay(window_seconds: f64) -> u16 {
    (window_seconds * 100.0).round().clamp(1.0, u16::MAX as f64) as u16
}

/// Encodes every remaining window as a looping GIF.
///
/// Returns the number of frames written. Writes nothing when the signal is
/// shorter than one window.
pub fn encode_gif<W: Write>(windows: SpectrumWindows<'_>, delay: u16, writer: W) -> Result<usize> {
    if windows.len() == 0 {
        return Ok(0);
    }
    let sample_rate = windows.sample_rate();

    let mut encoder = gif::Encoder::new(writer, FRAME_WIDTH as u16, FRAME_HEIGHT as u16, &[])
        .context("Failed to start GIF stream")?;
    encoder
        .set_repeat(gif::Repeat::Infinite)
        .context("Failed to write GIF loop extension")?;

    let mut written = 0;
    for frame in windows {
        let frame = frame?;
        let canvas = render_frame(&frame, sample_rate);
        let mut gif_frame = gif::Frame::from_rgb_speed(
            FRAME_WIDTH as u16,
            FRAME_HEIGHT as u16,
            canvas.pixels(),
            QUANTIZE_SPEED,
        );
        gif_frame.delay = delay;
        encoder
            .write_frame(&gif_frame)
            .with_context(|| format!("Failed to write GIF frame {}", frame.index))?;
        written += 1;
    }

    debug!("encoded {} animation frames", written);
    Ok(written)
}
