//! Per-bin gain application.

use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::analyzer::Spectrum;
use crate::curve::{loss_to_gain, AttenuationCurve};
use crate::error::{DspError, DspResult};

/// Flat scale applied to every bin before the curve gain.
pub const DEFAULT_GAIN_BOOST: f64 = 100.0;

/// Correction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Flat multiplier applied to every bin. It carries through resynthesis
    /// as a net amplitude factor on the output.
    pub gain_boost: f64,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            gain_boost: DEFAULT_GAIN_BOOST,
        }
    }
}

impl CorrectionConfig {
    pub fn validate(&self) -> DspResult<()> {
        if !self.gain_boost.is_finite() || self.gain_boost <= 0.0 {
            return Err(DspError::invalid_param(
                "gain_boost",
                format!("must be a positive finite number, got {}", self.gain_boost),
            ));
        }
        Ok(())
    }
}

/// A spectrum after boost and curve gain, ready for resynthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedSpectrum {
    spectrum: Spectrum,
    gain_boost: f64,
}

impl CorrectedSpectrum {
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn bins(&self) -> &[Complex<f64>] {
        self.spectrum.bins()
    }

    pub fn len(&self) -> usize {
        self.spectrum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectrum.is_empty()
    }

    pub fn n_samples(&self) -> usize {
        self.spectrum.n_samples()
    }

    /// Boost still carried by the bins.
    pub fn gain_boost(&self) -> f64 {
        self.gain_boost
    }
}

/// Scales each bin by the boost and by `10^(-loss/10)` of its frequency.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectionApplicator {
    config: CorrectionConfig,
}

impl CorrectionApplicator {
    pub fn new(config: CorrectionConfig) -> DspResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_gain_boost(gain_boost: f64) -> DspResult<Self> {
        Self::new(CorrectionConfig { gain_boost })
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    /// Applies `curve` to `spectrum`.
    ///
    /// The boost is applied to every bin first, then each bin is scaled by the
    /// curve gain at its axis frequency.
    pub fn apply(&self, spectrum: &Spectrum, curve: &AttenuationCurve) -> CorrectedSpectrum {
        let boost = self.config.gain_boost;

        let spectrum = spectrum.map_bins(|bin, frequency| {
            let boosted = bin * boost;
            boosted * loss_to_gain(curve.loss_db(frequency))
        });

        CorrectedSpectrum {
            spectrum,
            gain_boost: boost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SpectralAnalyzer;
    use earshape_spec::{AudiogramPoint, Ear};

    fn test_signal(n: usize) -> Vec<f64> {
        (0..n).map(|i| ((i * 7919) % 200) as f64 - 100.0).collect()
    }

    #[test]
    fn test_length_preserved() {
        let mut analyzer = SpectralAnalyzer::new();
        let curve = AttenuationCurve::flat(Ear::Left, 6.0, 8000).unwrap();
        let applicator = CorrectionApplicator::default();

        for n in [8, 9, 31, 64, 1000] {
            let spectrum = analyzer.analyze(&test_signal(n), 8000).unwrap();
            let corrected = applicator.apply(&spectrum, &curve);
            assert_eq!(corrected.len(), spectrum.len());
            assert_eq!(corrected.n_samples(), n);
        }
    }

    #[test]
    fn test_flat_zero_loss_only_boosts() {
        let mut analyzer = SpectralAnalyzer::new();
        let spectrum = analyzer.analyze(&test_signal(64), 8000).unwrap();
        let curve = AttenuationCurve::flat(Ear::Right, 0.0, 8000).unwrap();
        let corrected = CorrectionApplicator::default().apply(&spectrum, &curve);

        for (before, after) in spectrum.bins().iter().zip(corrected.bins()) {
            assert!((*after - *before * 100.0).norm() < 1e-9);
        }
        assert_eq!(corrected.gain_boost(), 100.0);
    }

    #[test]
    fn test_positive_loss_attenuates() {
        let mut analyzer = SpectralAnalyzer::new();
        let spectrum = analyzer.analyze(&test_signal(64), 8000).unwrap();
        let points = [
            AudiogramPoint::new(1000.0, 10.0),
            AudiogramPoint::new(3000.0, 10.0),
        ];
        let curve = AttenuationCurve::build(Ear::Left, &points, 8000).unwrap();
        let corrected = CorrectionApplicator::with_gain_boost(1.0)
            .unwrap()
            .apply(&spectrum, &curve);

        for (before, after) in spectrum.bins().iter().zip(corrected.bins()) {
            assert!((after.norm() - before.norm() * 0.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_bad_boost() {
        assert!(CorrectionApplicator::with_gain_boost(0.0).is_err());
        assert!(CorrectionApplicator::with_gain_boost(f64::NAN).is_err());
    }
}
