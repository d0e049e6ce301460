//! Frequency axis bookkeeping shared by analysis and correction.

/// Number of real-FFT bins for a signal of `n_samples` samples.
pub fn bin_count(n_samples: usize) -> usize {
    n_samples / 2 + 1
}

/// Frequencies of the bins of a real-FFT spectrum.
///
/// Bin `k` sits at `k * (sample_rate / n_samples)` Hz. The last bin is the
/// Nyquist frequency for even lengths and just below it for odd lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyAxis {
    resolution: f64,
    len: usize,
}

impl FrequencyAxis {
    /// Axis for the spectrum of a signal of `n_samples` samples at `sample_rate`.
    pub fn new(sample_rate: u32, n_samples: usize) -> Self {
        let resolution = if n_samples == 0 {
            0.0
        } else {
            sample_rate as f64 / n_samples as f64
        };
        Self {
            resolution,
            len: bin_count(n_samples),
        }
    }

    /// Spacing between adjacent bins in Hz.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Frequency of bin `k` in Hz.
    pub fn frequency(&self, k: usize) -> f64 {
        k as f64 * self.resolution
    }

    /// Highest frequency on the axis.
    pub fn max_frequency(&self) -> f64 {
        self.frequency(self.len.saturating_sub(1))
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |k| self.frequency(k))
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}
