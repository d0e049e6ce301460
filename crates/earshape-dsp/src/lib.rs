//! Earshape Spectral Correction
//!
//! Whole-signal spectral correction of 16-bit stereo audio against an
//! audiogram. Each channel is transformed with one FFT over its full length,
//! every bin is scaled by the gain its ear's interpolated loss curve gives at
//! that bin's frequency, and the result is transformed back and saturated to
//! 16-bit PCM.
//!
//! # Example
//!
//! ```
//! use earshape_dsp::{correct_stereo, CorrectionConfig, StereoPcm};
//! use earshape_spec::{Audiogram, AudiogramPoint};
//!
//! let points = [
//!     AudiogramPoint::new(100.0, 0.0),
//!     AudiogramPoint::new(1000.0, 10.0),
//!     AudiogramPoint::new(5000.0, 20.0),
//! ];
//! let audiogram = Audiogram::new(points, points).unwrap();
//! let audio = StereoPcm::new(16000, vec![0; 256], vec![0; 256]).unwrap();
//!
//! let output = correct_stereo(&audio, &audiogram, CorrectionConfig::default()).unwrap();
//! assert_eq!(output.pcm.frames(), 256);
//! ```
//!
//! # Modules
//!
//! - [`axis`]: Bin frequencies
//! - [`spline`]: Not-a-knot cubic spline
//! - [`curve`]: Per-ear attenuation curves
//! - [`analyzer`]: Forward real FFT
//! - [`applicator`]: Per-bin gain
//! - [`synthesizer`]: Inverse real FFT
//! - [`pcm`]: Stereo PCM and 16-bit conversion
//! - [`pipeline`]: End-to-end correction
//! - [`window`]: Windowed diagnostic spectra

pub mod analyzer;
pub mod applicator;
pub mod axis;
pub mod curve;
pub mod error;
pub mod pcm;
pub mod pipeline;
pub mod spline;
pub mod synthesizer;
pub mod window;

pub use analyzer::{SpectralAnalyzer, Spectrum};
pub use applicator::{CorrectedSpectrum, CorrectionApplicator, CorrectionConfig, DEFAULT_GAIN_BOOST};
pub use axis::{bin_count, FrequencyAxis};
pub use curve::{loss_to_gain, AttenuationCurve, EarCurves};
pub use error::{DspError, DspResult};
pub use pcm::{interleave_to_pcm16, saturate_to_i16, Pcm16, StereoPcm};
pub use pipeline::{correct_stereo, CorrectionOutput, CorrectionPipeline};
pub use spline::CubicSpline;
pub use synthesizer::SpectralSynthesizer;
pub use window::{magnitude_db, SpectrumWindows, WindowConfig, WindowFrame};
