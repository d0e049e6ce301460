//! Attenuation curves built from audiogram points.
//!
//! Each ear's sparse audiogram is padded with flat boundary points at 0 Hz and
//! at the sampling rate, then fitted with a not-a-knot cubic spline, giving a
//! loss value for every frequency in `[0, sample_rate]`.
//!
//! The spline is not monotone. Far outside the measured band it can swing
//! hundreds of dB away from the boundary values.

use earshape_spec::{Audiogram, AudiogramPoint, Ear};
use log::debug;

use crate::axis::FrequencyAxis;
use crate::error::{DspError, DspResult};
use crate::spline::CubicSpline;

/// Converts a loss in dB to the linear bin gain `10^(-loss/10)`.
pub fn loss_to_gain(loss_db: f64) -> f64 {
    10f64.powf(-loss_db / 10.0)
}

/// Continuous per-frequency loss for one ear.
#[derive(Debug, Clone, PartialEq)]
pub struct AttenuationCurve {
    ear: Ear,
    sample_rate: u32,
    spline: CubicSpline,
}

impl AttenuationCurve {
    /// Builds the curve for one ear's points at the given sampling rate.
    ///
    /// Points need not be sorted. A measured point already sitting at 0 Hz or
    /// at `sample_rate` takes the place of the corresponding boundary point.
    /// Points above `sample_rate` are kept, so the knots may extend past it;
    /// the rate pad then sits between measured points.
    pub fn build(ear: Ear, points: &[AudiogramPoint], sample_rate: u32) -> DspResult<Self> {
        if sample_rate == 0 {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }

        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));

        let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
            return Err(DspError::TooFewKnots { count: 0 });
        };

        let rate = sample_rate as f64;
        if first.frequency_hz > 0.0 {
            sorted.insert(0, AudiogramPoint::new(0.0, first.loss_db));
        }
        if !sorted.iter().any(|p| p.frequency_hz == rate) {
            sorted.push(AudiogramPoint::new(rate, last.loss_db));
            sorted.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));
        }

        let (xs, ys): (Vec<f64>, Vec<f64>) =
            sorted.iter().map(|p| (p.frequency_hz, p.loss_db)).unzip();
        debug!("{} ear curve knots: {:?} -> {:?}", ear, xs, ys);

        let spline = CubicSpline::not_a_knot(xs, ys)?;

        Ok(Self {
            ear,
            sample_rate,
            spline,
        })
    }

    /// A curve with the same loss at every frequency.
    pub fn flat(ear: Ear, loss_db: f64, sample_rate: u32) -> DspResult<Self> {
        let rate = sample_rate as f64;
        let points = [
            AudiogramPoint::new(rate / 3.0, loss_db),
            AudiogramPoint::new(rate * 2.0 / 3.0, loss_db),
        ];
        Self::build(ear, &points, sample_rate)
    }

    pub fn ear(&self) -> Ear {
        self.ear
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Loss in dB at `frequency_hz`. Defined on `[0, sample_rate]`.
    pub fn loss_db(&self, frequency_hz: f64) -> f64 {
        debug_assert!(
            (0.0..=self.sample_rate as f64).contains(&frequency_hz),
            "frequency {} outside curve domain",
            frequency_hz
        );
        self.spline.eval(frequency_hz)
    }

    /// Linear gain applied to a bin at `frequency_hz`.
    pub fn gain(&self, frequency_hz: f64) -> f64 {
        loss_to_gain(self.loss_db(frequency_hz))
    }

    /// Loss at every bin of `axis`.
    pub fn sample(&self, axis: &FrequencyAxis) -> Vec<f64> {
        axis.iter().map(|f| self.loss_db(f)).collect()
    }

    /// The padded knots the curve passes through.
    pub fn knots(&self) -> impl Iterator<Item = AudiogramPoint> + '_ {
        self.spline
            .knots()
            .iter()
            .zip(self.spline.values())
            .map(|(&f, &db)| AudiogramPoint::new(f, db))
    }
}

/// Attenuation curves for both ears.
#[derive(Debug, Clone, PartialEq)]
pub struct EarCurves {
    pub left: AttenuationCurve,
    pub right: AttenuationCurve,
}

impl EarCurves {
    /// Builds both curves from an audiogram.
    pub fn from_audiogram(audiogram: &Audiogram, sample_rate: u32) -> DspResult<Self> {
        Ok(Self {
            left: AttenuationCurve::build(Ear::Left, audiogram.left(), sample_rate)?,
            right: AttenuationCurve::build(Ear::Right, audiogram.right(), sample_rate)?,
        })
    }

    pub fn get(&self, ear: Ear) -> &AttenuationCurve {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }
}
