//! RGB raster with line drawing and deterministic PNG encoding.

use std::io::Write;
use std::ops::Range;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

pub type Rgb = [u8; 3];

pub const BACKGROUND_COLOR: Rgb = [255, 255, 255];
pub const FRAME_COLOR: Rgb = [64, 64, 64];
pub const GRID_COLOR: Rgb = [224, 224, 224];

/// Line pattern for polylines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Solid,
    /// `on` pixels drawn, `off` pixels skipped, repeating along the line.
    Dashed { on: u32, off: u32 },
}

impl Stroke {
    pub const DASHED: Stroke = Stroke::Dashed { on: 6, off: 4 };

    fn visible(self, step: u32) -> bool {
        match self {
            Stroke::Solid => true,
            Stroke::Dashed { on, off } => step % (on + off) < on,
        }
    }
}

/// An 8-bit RGB image buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let pixels = background
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Sets a pixel; coordinates outside the canvas are ignored.
    pub fn set(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
    }

    pub fn fill_rect(&mut self, xs: Range<i64>, ys: Range<i64>, color: Rgb) {
        for y in ys {
            for x in xs.clone() {
                self.set(x, y, color);
            }
        }
    }

    pub fn hline(&mut self, xs: Range<i64>, y: i64, color: Rgb) {
        self.fill_rect(xs, y..y + 1, color);
    }

    pub fn vline(&mut self, x: i64, ys: Range<i64>, color: Rgb) {
        self.fill_rect(x..x + 1, ys, color);
    }

    /// Draws a connected line through `points`.
    ///
    /// The dash pattern continues across segment joins.
    pub fn polyline(&mut self, points: &[(i64, i64)], color: Rgb, stroke: Stroke) {
        let mut step = 0u32;
        if let [single] = points {
            self.set(single.0, single.1, color);
            return;
        }
        for pair in points.windows(2) {
            step = self.segment(pair[0], pair[1], color, stroke, step);
        }
    }

    // Bresenham; returns the dash step reached at the segment end.
    fn segment(
        &mut self,
        (x0, y0): (i64, i64),
        (x1, y1): (i64, i64),
        color: Rgb,
        stroke: Stroke,
        mut step: u32,
    ) -> u32 {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            if stroke.visible(step) {
                self.set(x, y, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            step = step.wrapping_add(1);
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        step
    }

    /// Encodes the canvas as PNG.
    pub fn encode_png(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        self.write_png(&mut buffer)
            .expect("PNG encoding to Vec should not fail");
        buffer
    }

    /// Encodes the canvas as PNG to a writer.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<(), png::EncodingError> {
        let mut encoder = Encoder::new(writer, self.width, self.height);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        // Fixed settings keep the output byte-stable
        encoder.set_compression(Compression::Default);
        encoder.set_filter(FilterType::NoFilter);

        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&self.pixels)?;
        Ok(())
    }
}

/// Maps data coordinates onto a rectangular region of a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plot {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Pixel bounds of the plotting area: left, top, right, bottom (inclusive).
    pub area: (i64, i64, i64, i64),
}

impl Plot {
    /// A plot filling `canvas` minus `margin` pixels on every side.
    pub fn new(canvas: &Canvas, margin: i64, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            x_range,
            y_range,
            area: (
                margin,
                margin,
                canvas.width() as i64 - 1 - margin,
                canvas.height() as i64 - 1 - margin,
            ),
        }
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (i64, i64) {
        let (left, top, right, bottom) = self.area;
        let fx = normalize(x, self.x_range);
        let fy = normalize(y, self.y_range);
        let px = left as f64 + fx * (right - left) as f64;
        let py = bottom as f64 - fy * (bottom - top) as f64;
        (px.round() as i64, py.round() as i64)
    }

    /// Data x at horizontal pixel offset `column` inside the area.
    pub fn x_at(&self, column: i64) -> f64 {
        let (left, _, right, _) = self.area;
        let span = (right - left).max(1) as f64;
        self.x_range.0 + (column as f64 / span) * (self.x_range.1 - self.x_range.0)
    }

    pub fn columns(&self) -> i64 {
        self.area.2 - self.area.0 + 1
    }

    /// Draws `divisions` evenly spaced grid lines on each axis, then the frame.
    pub fn draw_axes(&self, canvas: &mut Canvas, divisions: u32) {
        let (left, top, right, bottom) = self.area;
        for i in 1..divisions as i64 {
            let x = left + (right - left) * i / divisions as i64;
            let y = top + (bottom - top) * i / divisions as i64;
            canvas.vline(x, top..bottom + 1, GRID_COLOR);
            canvas.hline(left..right + 1, y, GRID_COLOR);
        }
        canvas.hline(left..right + 1, top, FRAME_COLOR);
        canvas.hline(left..right + 1, bottom, FRAME_COLOR);
        canvas.vline(left, top..bottom + 1, FRAME_COLOR);
        canvas.vline(right, top..bottom + 1, FRAME_COLOR);
    }

    /// Draws `(x, y)` data as a polyline, clamping y into the visible range.
    pub fn draw_series(
        &self,
        canvas: &mut Canvas,
        points: impl IntoIterator<Item = (f64, f64)>,
        color: Rgb,
        stroke: Stroke,
    ) {
        let (lo, hi) = (
            self.y_range.0.min(self.y_range.1),
            self.y_range.0.max(self.y_range.1),
        );
        let pixels: Vec<(i64, i64)> = points
            .into_iter()
            .map(|(x, y)| {
                let y = if y.is_nan() { lo } else { y.clamp(lo, hi) };
                self.to_pixel(x, y)
            })
            .collect();
        canvas.polyline(&pixels, color, stroke);
    }
}

fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if hi == lo {
        0.5
    } else {
        (value - lo) / (hi - lo)
    }
}
