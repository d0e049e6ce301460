//! Raster output: the audiogram plot (PNG) and the spectra animation (GIF).

pub mod animation;
pub mod canvas;
pub mod curve_plot;

pub use animation::{encode_gif, frame_delay, render_frame};
pub use canvas::{Canvas, Plot, Stroke};
pub use curve_plot::{audiogram_png, render_audiogram};
