//! Forward transform of a time-domain channel into a scaled spectrum.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::axis::{bin_count, FrequencyAxis};
use crate::error::{DspError, DspResult};

/// Real-FFT spectrum of one channel, scaled by `1 / n_samples`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bins: Vec<Complex<f64>>,
    n_samples: usize,
    sample_rate: u32,
}

impl Spectrum {
    /// Wraps precomputed bins. `bins.len()` must be `n_samples / 2 + 1`.
    pub fn from_bins(
        bins: Vec<Complex<f64>>,
        n_samples: usize,
        sample_rate: u32,
    ) -> DspResult<Self> {
        if n_samples == 0 {
            return Err(DspError::EmptySignal);
        }
        let expected = bin_count(n_samples);
        if bins.len() != expected {
            return Err(DspError::SpectrumLength {
                expected,
                actual: bins.len(),
                n_samples,
            });
        }
        Ok(Self {
            bins,
            n_samples,
            sample_rate,
        })
    }

    pub fn bins(&self) -> &[Complex<f64>] {
        &self.bins
    }

    pub fn into_bins(self) -> Vec<Complex<f64>> {
        self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Length of the time-domain signal this spectrum came from.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frequency of each bin.
    pub fn axis(&self) -> FrequencyAxis {
        FrequencyAxis::new(self.sample_rate, self.n_samples)
    }

    /// Maps every bin together with its frequency, keeping the layout.
    pub(crate) fn map_bins(&self, mut f: impl FnMut(Complex<f64>, f64) -> Complex<f64>) -> Self {
        let axis = self.axis();
        let bins = self
            .bins
            .iter()
            .zip(axis.iter())
            .map(|(&bin, frequency)| f(bin, frequency))
            .collect();
        Self {
            bins,
            n_samples: self.n_samples,
            sample_rate: self.sample_rate,
        }
    }

    /// Magnitude of each bin.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.bins.iter().map(|c| c.norm()).collect()
    }
}

/// Forward real FFT with energy-conserving `1/N` scaling.
///
/// Holds an FFT planner so repeated analyses of the same length reuse plans.
pub struct SpectralAnalyzer {
    planner: FftPlanner<f64>,
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Transforms a channel of 16-bit samples.
    pub fn analyze_pcm(&mut self, samples: &[i16], sample_rate: u32) -> DspResult<Spectrum> {
        let samples: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
        self.analyze(&samples, sample_rate)
    }

    /// Transforms a channel of real samples.
    ///
    /// No window is applied: the whole signal is one frame.
    pub fn analyze(&mut self, samples: &[f64], sample_rate: u32) -> DspResult<Spectrum> {
        if samples.is_empty() {
            return Err(DspError::EmptySignal);
        }
        if sample_rate == 0 {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }

        let n = samples.len();
        let fft = self.planner.plan_fft_forward(n);

        let mut buffer: Vec<Complex<f64>> =
            samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
        fft.process(&mut buffer);

        let scale = 1.0 / n as f64;
        buffer.truncate(bin_count(n));
        for bin in buffer.iter_mut() {
            *bin *= scale;
        }

        Spectrum::from_bins(buffer, n, sample_rate)
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
