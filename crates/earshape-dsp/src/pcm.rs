//! 16-bit stereo PCM containers and float-to-integer conversion.

use earshape_spec::Ear;

use crate::error::{DspError, DspResult};

/// Two equal-length channels of signed 16-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereoPcm {
    sample_rate: u32,
    left: Vec<i16>,
    right: Vec<i16>,
}

impl StereoPcm {
    pub fn new(sample_rate: u32, left: Vec<i16>, right: Vec<i16>) -> DspResult<Self> {
        if sample_rate == 0 {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        if left.len() != right.len() {
            return Err(DspError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        Ok(Self {
            sample_rate,
            left,
            right,
        })
    }

    /// Splits interleaved `L R L R ...` samples into channels.
    pub fn from_interleaved(sample_rate: u32, samples: &[i16]) -> DspResult<Self> {
        if samples.len() % 2 != 0 {
            return Err(DspError::OddInterleavedLength { len: samples.len() });
        }
        let (left, right): (Vec<i16>, Vec<i16>) =
            samples.chunks_exact(2).map(|f| (f[0], f[1])).unzip();
        Self::new(sample_rate, left, right)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of stereo frames.
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn channel(&self, ear: Ear) -> &[i16] {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn interleaved(&self) -> Vec<i16> {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }
}

/// Rounds to the nearest integer and saturates to the `i16` range.
///
/// NaN maps to 0.
pub fn saturate_to_i16(sample: f64) -> i16 {
    // `as` saturates float-to-int casts and maps NaN to 0
    sample.round() as i16
}

/// Interleaved 16-bit output plus how many samples had to be clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcm16 {
    /// Interleaved `L R L R ...` samples.
    pub samples: Vec<i16>,
    /// Number of samples that fell outside the `i16` range.
    pub saturated: usize,
}

impl Pcm16 {
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    /// Little-endian bytes of the interleaved samples.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Interleaves two float channels into saturated 16-bit stereo frames.
pub fn interleave_to_pcm16(left: &[f64], right: &[f64]) -> DspResult<Pcm16> {
    if left.len() != right.len() {
        return Err(DspError::ChannelLengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let range = i16::MIN as f64..=i16::MAX as f64;
    let mut saturated = 0;
    let mut samples = Vec::with_capacity(left.len() * 2);

    for (&l, &r) in left.iter().zip(right) {
        for value in [l, r] {
            if !range.contains(&value.round()) {
                saturated += 1;
            }
            samples.push(saturate_to_i16(value));
        }
    }

    Ok(Pcm16 { samples, saturated })
}
