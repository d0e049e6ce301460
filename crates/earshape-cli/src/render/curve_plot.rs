//! Audiogram curve plot.
//!
//! Draws the negated loss of both ears over `[0, max_frequency]`, left ear in
//! blue and right ear in red, both dashed.

use earshape_dsp::{EarCurves, FrequencyAxis};
use earshape_spec::Ear;

use super::canvas::{Canvas, Plot, Rgb, Stroke, BACKGROUND_COLOR};

pub const PLOT_WIDTH: u32 = 800;
pub const PLOT_HEIGHT: u32 = 400;
const MARGIN: i64 = 24;
const GRID_DIVISIONS: u32 = 8;

pub const LEFT_COLOR: Rgb = [0, 0, 255];
pub const RIGHT_COLOR: Rgb = [255, 0, 0];

fn ear_color(ear: Ear) -> Rgb {
    match ear {
        Ear::Left => LEFT_COLOR,
        Ear::Right => RIGHT_COLOR,
    }
}

/// Renders both curves over the frequencies covered by `axis`.
pub fn render_audiogram(curves: &EarCurves, axis: &FrequencyAxis) -> Canvas {
    let mut max_frequency = axis.max_frequency();
    if max_frequency <= 0.0 {
        // A one-bin axis has no width; fall back to Nyquist
        max_frequency = curves.left.sample_rate() as f64 / 2.0;
    }

    let mut canvas = Canvas::new(PLOT_WIDTH, PLOT_HEIGHT, BACKGROUND_COLOR);
    let probe = Plot::new(&canvas, MARGIN, (0.0, max_frequency), (0.0, 1.0));

    let series: Vec<(Ear, Vec<(f64, f64)>)> = Ear::ALL
        .iter()
        .map(|&ear| {
            let curve = curves.get(ear);
            let points = (0..probe.columns())
                .map(|col| {
                    let f = probe.x_at(col).min(max_frequency);
                    (f, -curve.loss_db(f))
                })
                .collect();
            (ear, points)
        })
        .collect();

    let plot = Plot {
        y_range: value_range(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1))),
        ..probe
    };
    plot.draw_axes(&mut canvas, GRID_DIVISIONS);
    for (ear, points) in series {
        plot.draw_series(&mut canvas, points, ear_color(ear), Stroke::DASHED);
    }
    canvas
}

/// PNG bytes of [`render_audiogram`].
pub fn audiogram_png(curves: &EarCurves, axis: &FrequencyAxis) -> Vec<u8> {
    render_audiogram(curves, axis).encode_png()
}

/// Padded `(min, max)` of finite values, at least 2 dB tall.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (-1.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo - pad, hi + pad)
}
