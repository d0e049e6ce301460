//! Windowed before/after spectra for diagnostics.
//!
//! [`SpectrumWindows`] walks fixed-length, non-overlapping windows over the
//! original and corrected signals and yields their dB spectra one window at a
//! time. The iterator owns its cursor, so it is finite and is consumed as it
//! goes; build a new one to walk the signal again.

use earshape_spec::Ear;
use log::debug;

use crate::analyzer::SpectralAnalyzer;
use crate::axis::FrequencyAxis;
use crate::error::{DspError, DspResult};
use crate::pcm::StereoPcm;
use crate::pipeline::CorrectionOutput;

/// Default window length in seconds.
pub const DEFAULT_WINDOW_SECONDS: f64 = 0.1;

/// Full-scale reference for dB conversion.
pub const FULL_SCALE: f64 = 32767.0;

/// Diagnostic window settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    /// Window length (and hop) in seconds.
    pub window_seconds: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> DspResult<()> {
        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 {
            return Err(DspError::invalid_param(
                "window_seconds",
                format!("must be a positive finite number, got {}", self.window_seconds),
            ));
        }
        Ok(())
    }

    /// Window length in samples at `sample_rate`.
    pub fn window_len(&self, sample_rate: u32) -> DspResult<usize> {
        self.validate()?;
        let len = (self.window_seconds * sample_rate as f64) as usize;
        if len == 0 {
            return Err(DspError::invalid_param(
                "window_seconds",
                format!(
                    "{} s is shorter than one sample at {} Hz",
                    self.window_seconds, sample_rate
                ),
            ));
        }
        Ok(len)
    }
}

/// Converts a normalized bin magnitude to dB relative to full scale.
///
/// Zero magnitude gives negative infinity rather than an error.
pub fn magnitude_db(magnitude: f64) -> f64 {
    10.0 * (magnitude / FULL_SCALE).log10()
}

/// dB spectra of one window of both channels, before and after correction.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrame {
    /// Zero-based window number.
    pub index: usize,
    /// First sample of the window.
    pub start: usize,
    /// Window length in samples.
    pub len: usize,
    /// Frequency of each bin.
    pub axis: FrequencyAxis,
    pub original_left: Vec<f64>,
    pub original_right: Vec<f64>,
    pub corrected_left: Vec<f64>,
    pub corrected_right: Vec<f64>,
    /// Bins whose magnitude was zero (plotted at the floor).
    pub silent_bins: usize,
    /// Fraction of the signal covered once this window is drawn.
    pub progress: f64,
}

impl WindowFrame {
    pub fn original(&self, ear: Ear) -> &[f64] {
        match ear {
            Ear::Left => &self.original_left,
            Ear::Right => &self.original_right,
        }
    }

    pub fn corrected(&self, ear: Ear) -> &[f64] {
        match ear {
            Ear::Left => &self.corrected_left,
            Ear::Right => &self.corrected_right,
        }
    }
}

/// Lazy sequence of [`WindowFrame`]s over a corrected signal.
pub struct SpectrumWindows<'a> {
    original: [Vec<f64>; 2],
    corrected: [&'a [f64]; 2],
    sample_rate: u32,
    window_len: usize,
    total: usize,
    next_index: usize,
    analyzer: SpectralAnalyzer,
}

impl<'a> SpectrumWindows<'a> {
    pub fn new(
        original: &StereoPcm,
        corrected: &'a CorrectionOutput,
        config: WindowConfig,
    ) -> DspResult<Self> {
        let sample_rate = original.sample_rate();
        let window_len = config.window_len(sample_rate)?;
        let total = original.frames();
        if corrected.left.len() != total || corrected.right.len() != total {
            return Err(DspError::ChannelLengthMismatch {
                left: total,
                right: corrected.left.len().min(corrected.right.len()),
            });
        }

        let to_f64 = |ear| -> Vec<f64> {
            original.channel(ear).iter().map(|&s| s as f64).collect()
        };

        Ok(Self {
            original: [to_f64(Ear::Left), to_f64(Ear::Right)],
            corrected: [&corrected.left, &corrected.right],
            sample_rate,
            window_len,
            total,
            next_index: 0,
            analyzer: SpectralAnalyzer::new(),
        })
    }

    /// Total number of windows the iterator will yield from the start.
    pub fn window_count(&self) -> usize {
        self.total / self.window_len
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn spectrum_db(&mut self, samples: &[f64], silent: &mut usize) -> DspResult<Vec<f64>> {
        let spectrum = self.analyzer.analyze(samples, self.sample_rate)?;
        Ok(spectrum
            .bins()
            .iter()
            .map(|bin| {
                let magnitude = bin.norm();
                if magnitude == 0.0 {
                    *silent += 1;
                }
                magnitude_db(magnitude)
            })
            .collect())
    }

    fn frame(&mut self, index: usize) -> DspResult<WindowFrame> {
        let start = index * self.window_len;
        let end = start + self.window_len;
        let mut silent = 0;

        let original: [Vec<f64>; 2] = [
            self.original[0][start..end].to_vec(),
            self.original[1][start..end].to_vec(),
        ];
        let [left, right] = self.corrected;
        let corrected: [&'a [f64]; 2] = [&left[start..end], &right[start..end]];

        let original_left = self.spectrum_db(&original[0], &mut silent)?;
        let original_right = self.spectrum_db(&original[1], &mut silent)?;
        let corrected_left = self.spectrum_db(corrected[0], &mut silent)?;
        let corrected_right = self.spectrum_db(corrected[1], &mut silent)?;

        if silent > 0 {
            debug!("window {}: {} silent bins drawn at the floor", index, silent);
        }

        Ok(WindowFrame {
            index,
            start,
            len: self.window_len,
            axis: FrequencyAxis::new(self.sample_rate, self.window_len),
            original_left,
            original_right,
            corrected_left,
            corrected_right,
            silent_bins: silent,
            progress: end as f64 / self.total as f64,
        })
    }
}

impl Iterator for SpectrumWindows<'_> {
    type Item = DspResult<WindowFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        let start = index * self.window_len;
        if start + self.window_len > self.total {
            return None;
        }
        self.next_index += 1;
        Some(self.frame(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.window_count().saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SpectrumWindows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicator::CorrectionConfig;
    use crate::pipeline::correct_stereo;
    use earshape_spec::{Audiogram, AudiogramPoint};

    fn setup(frames: usize) -> (StereoPcm, CorrectionOutput) {
        let left: Vec<i16> = (0..frames).map(|i| ((i * 31) % 400) as i16 - 200).collect();
        let audio = StereoPcm::new(8000, left, vec![0; frames]).unwrap();
        let points = [
            AudiogramPoint::new(500.0, 0.0),
            AudiogramPoint::new(2000.0, 6.0),
        ];
        let audiogram = Audiogram::new(points, points).unwrap();
        let output = correct_stereo(&audio, &audiogram, CorrectionConfig::default()).unwrap();
        (audio, output)
    }

    #[test]
    fn test_window_count_and_exhaustion() {
        let (audio, output) = setup(2500);
        let windows = SpectrumWindows::new(&audio, &output, WindowConfig::default()).unwrap();

        // 800-sample windows over 2500 samples: the partial tail is dropped
        assert_eq!(windows.window_count(), 3);
        assert_eq!(windows.len(), 3);

        let frames: Vec<_> = windows.map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].start, 1600);
        assert_eq!(frames[2].len, 800);
        assert!((frames[2].progress - 2400.0 / 2500.0).abs() < 1e-12);
    }

    #[test]
    fn test_silent_channel_is_floor_not_error() {
        let (audio, output) = setup(800);
        let frame = SpectrumWindows::new(&audio, &output, WindowConfig::default())
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        assert!(frame.original(Ear::Right).iter().all(|db| *db == f64::NEG_INFINITY));
        assert!(frame.silent_bins >= frame.axis.len());
        assert!(frame.original(Ear::Left).iter().any(|db| db.is_finite()));
        assert_eq!(frame.corrected(Ear::Left).len(), frame.axis.len());
    }

    #[test]
    fn test_window_shorter_than_sample_rejected() {
        let (audio, output) = setup(100);
        let config = WindowConfig {
            window_seconds: 0.00001,
        };
        assert!(SpectrumWindows::new(&audio, &output, config).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(WindowConfig::default().validate().is_ok());
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(WindowConfig { window_seconds: bad }.validate().is_err());
        }
    }

    #[test]
    fn test_magnitude_db() {
        assert_eq!(magnitude_db(FULL_SCALE), 0.0);
        assert!((magnitude_db(FULL_SCALE / 10.0) + 10.0).abs() < 1e-12);
        assert_eq!(magnitude_db(0.0), f64::NEG_INFINITY);
    }
}
