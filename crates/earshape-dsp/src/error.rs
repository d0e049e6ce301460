//! Error types for the correction engine.

use thiserror::Error;

/// Result type for correction operations.
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur while building curves or transforming audio.
#[derive(Debug, Error)]
pub enum DspError {
    /// Not enough distinct knots for a cubic fit.
    #[error("cubic interpolation needs at least 4 distinct frequencies, found {count}")]
    TooFewKnots {
        /// Number of knots available after padding.
        count: usize,
    },

    /// Knot frequencies are not strictly increasing.
    #[error("knot frequencies must be strictly increasing (at index {index})")]
    UnsortedKnots {
        /// Index of the first offending knot.
        index: usize,
    },

    /// The spline system could not be solved.
    #[error("spline system is singular")]
    SingularSystem,

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// The signal has no samples.
    #[error("signal is empty")]
    EmptySignal,

    /// Left and right channels differ in length.
    #[error("channel length mismatch: left has {left} samples, right has {right}")]
    ChannelLengthMismatch {
        /// Left channel length.
        left: usize,
        /// Right channel length.
        right: usize,
    },

    /// Interleaved data does not hold whole stereo frames.
    #[error("interleaved stereo data has odd sample count {len}")]
    OddInterleavedLength {
        /// Number of interleaved samples.
        len: usize,
    },

    /// Spectrum length does not match the declared signal length.
    #[error("spectrum has {actual} bins, expected {expected} for {n_samples} samples")]
    SpectrumLength {
        /// Expected bin count.
        expected: usize,
        /// Actual bin count.
        actual: usize,
        /// Declared signal length.
        n_samples: usize,
    },

    /// Invalid configuration value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl DspError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether this error stems from the audiogram or configuration rather
    /// than from the audio itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DspError::TooFewKnots { .. }
                | DspError::UnsortedKnots { .. }
                | DspError::SingularSystem
                | DspError::InvalidParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_helper() {
        let err = DspError::invalid_param("gain_boost", "must be positive");
        assert!(err.to_string().contains("gain_boost"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_signal_errors_are_not_configuration() {
        assert!(!DspError::EmptySignal.is_configuration());
        assert!(!DspError::ChannelLengthMismatch { left: 1, right: 2 }.is_configuration());
    }
}
