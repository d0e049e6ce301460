//! Inverse transform of a corrected spectrum back to time-domain samples.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::analyzer::Spectrum;
use crate::applicator::CorrectedSpectrum;
use crate::error::DspResult;

/// Inverse real FFT that undoes the analyzer's `1/N` scaling.
///
/// The gain boost carried by a [`CorrectedSpectrum`] is left in place.
pub struct SpectralSynthesizer {
    planner: FftPlanner<f64>,
}

impl SpectralSynthesizer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Resynthesizes a corrected spectrum into `n_samples` real samples.
    pub fn synthesize(&mut self, corrected: &CorrectedSpectrum) -> DspResult<Vec<f64>> {
        self.inverse(corrected.spectrum())
    }

    /// Resynthesizes any analyzer spectrum into `n_samples` real samples.
    pub fn inverse(&mut self, spectrum: &Spectrum) -> DspResult<Vec<f64>> {
        let n = spectrum.n_samples();
        let bins = spectrum.bins();

        // Rebuild the full Hermitian spectrum, multiplied by N to undo the
        // analyzer's normalization.
        let scale = n as f64;
        let mut buffer = vec![Complex::new(0.0, 0.0); n];
        for (k, bin) in bins.iter().enumerate() {
            buffer[k] = *bin * scale;
        }
        // The imaginary parts of DC and (for even N) Nyquist have no real counterpart.
        buffer[0].im = 0.0;
        if n % 2 == 0 {
            buffer[n / 2].im = 0.0;
        }
        for k in bins.len()..n {
            buffer[k] = buffer[n - k].conj();
        }

        let fft = self.planner.plan_fft_inverse(n);
        fft.process(&mut buffer);

        // rustfft leaves the inverse unnormalized
        let norm = 1.0 / n as f64;
        Ok(buffer.iter().map(|c| c.re * norm).collect())
    }
}

impl Default for SpectralSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
