//! Batch correction of a stereo signal against an audiogram.
//!
//! Each channel is handled independently: build its curve, analyze, apply,
//! resynthesize. The two corrected channels are then interleaved and saturated
//! to 16-bit PCM.

use earshape_spec::{Audiogram, Ear};
use log::{debug, warn};

use crate::analyzer::SpectralAnalyzer;
use crate::applicator::{CorrectionApplicator, CorrectionConfig};
use crate::axis::FrequencyAxis;
use crate::curve::{AttenuationCurve, EarCurves};
use crate::error::{DspError, DspResult};
use crate::pcm::{interleave_to_pcm16, Pcm16, StereoPcm};
use crate::synthesizer::SpectralSynthesizer;

/// Everything produced by one correction run.
#[derive(Debug, Clone)]
pub struct CorrectionOutput {
    /// Per-ear attenuation curves.
    pub curves: EarCurves,
    /// Frequency of each spectrum bin.
    pub axis: FrequencyAxis,
    /// Corrected left channel before integer conversion.
    pub left: Vec<f64>,
    /// Corrected right channel before integer conversion.
    pub right: Vec<f64>,
    /// Interleaved, saturated 16-bit output.
    pub pcm: Pcm16,
}

impl CorrectionOutput {
    pub fn channel(&self, ear: Ear) -> &[f64] {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }
}

/// Analyzer, applicator and synthesizer wired together.
pub struct CorrectionPipeline {
    analyzer: SpectralAnalyzer,
    applicator: CorrectionApplicator,
    synthesizer: SpectralSynthesizer,
}

impl CorrectionPipeline {
    pub fn new(config: CorrectionConfig) -> DspResult<Self> {
        Ok(Self {
            analyzer: SpectralAnalyzer::new(),
            applicator: CorrectionApplicator::new(config)?,
            synthesizer: SpectralSynthesizer::new(),
        })
    }

    pub fn config(&self) -> &CorrectionConfig {
        self.applicator.config()
    }

    /// Corrects one channel with `curve`, returning `samples.len()` floats.
    pub fn correct_channel(
        &mut self,
        samples: &[i16],
        sample_rate: u32,
        curve: &AttenuationCurve,
    ) -> DspResult<Vec<f64>> {
        let spectrum = self.analyzer.analyze_pcm(samples, sample_rate)?;
        debug!(
            "{} channel: {} samples -> {} bins ({:.4} Hz/bin)",
            curve.ear(),
            samples.len(),
            spectrum.len(),
            spectrum.axis().resolution()
        );
        let corrected = self.applicator.apply(&spectrum, curve);
        self.synthesizer.synthesize(&corrected)
    }

    /// Corrects both channels of `audio` against `audiogram`.
    pub fn run(&mut self, audio: &StereoPcm, audiogram: &Audiogram) -> DspResult<CorrectionOutput> {
        if audio.is_empty() {
            return Err(DspError::EmptySignal);
        }
        let rate = audio.sample_rate();
        let curves = EarCurves::from_audiogram(audiogram, rate)?;

        let left = self.correct_channel(audio.channel(Ear::Left), rate, &curves.left)?;
        let right = self.correct_channel(audio.channel(Ear::Right), rate, &curves.right)?;

        let pcm = interleave_to_pcm16(&left, &right)?;
        if pcm.saturated > 0 {
            warn!(
                "{} of {} corrected samples exceeded the 16-bit range and were clipped",
                pcm.saturated,
                pcm.samples.len()
            );
        }

        Ok(CorrectionOutput {
            curves,
            axis: FrequencyAxis::new(rate, audio.frames()),
            left,
            right,
            pcm,
        })
    }
}

/// Runs a one-off correction with a fresh pipeline.
pub fn correct_stereo(
    audio: &StereoPcm,
    audiogram: &Audiogram,
    config: CorrectionConfig,
) -> DspResult<CorrectionOutput> {
    CorrectionPipeline::new(config)?.run(audio, audiogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use earshape_spec::AudiogramPoint;

    fn audiogram() -> Audiogram {
        let points = [
            AudiogramPoint::new(250.0, 5.0),
            AudiogramPoint::new(1000.0, 10.0),
            AudiogramPoint::new(4000.0, 25.0),
        ];
        Audiogram::new(points, points).unwrap()
    }

    #[test]
    fn test_output_length_matches_input() {
        let left: Vec<i16> = (0..101).map(|i| (i * 13 % 50) as i16).collect();
        let right: Vec<i16> = left.iter().map(|s| -s).collect();
        let audio = StereoPcm::new(16000, left, right).unwrap();

        let output = correct_stereo(&audio, &audiogram(), CorrectionConfig::default()).unwrap();

        assert_eq!(output.left.len(), 101);
        assert_eq!(output.right.len(), 101);
        assert_eq!(output.pcm.frames(), 101);
        assert_eq!(output.axis.len(), 51);
    }

    #[test]
    fn test_empty_audio_rejected() {
        let audio = StereoPcm::new(16000, vec![], vec![]).unwrap();
        let err = correct_stereo(&audio, &audiogram(), CorrectionConfig::default()).unwrap_err();
        assert!(matches!(err, DspError::EmptySignal));
    }

    #[test]
    fn test_extended_range_audiogram_on_low_rate_audio() {
        let points = [
            AudiogramPoint::new(250.0, 5.0),
            AudiogramPoint::new(4000.0, 20.0),
            AudiogramPoint::new(12000.0, 40.0),
        ];
        let audiogram = Audiogram::new(points, points).unwrap();
        let left: Vec<i16> = (0..400).map(|i| (i * 29 % 64) as i16 - 32).collect();
        let audio = StereoPcm::new(8000, left.clone(), left).unwrap();

        let output = correct_stereo(&audio, &audiogram, CorrectionConfig::default()).unwrap();

        assert_eq!(output.axis.max_frequency(), 4000.0);
        assert!(output.curves.left.sample(&output.axis).iter().all(|l| l.is_finite()));
        assert!(output.left.iter().all(|s| s.is_finite()));
    }
}
