//! Audiogram types.
//!
//! An audiogram is a per-ear table of measured hearing loss, stored as sparse
//! `[frequency_hz, loss_db]` pairs. Points are kept sorted by frequency so
//! downstream curve fitting can treat them as samples of a function.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AudiogramError, SpecResult};
use crate::validation::{audiogram_from_value, validate_points};

/// Minimum number of distinct measured frequencies per ear.
///
/// Curve fitting pads each ear with boundary points at 0 Hz and at the
/// sampling rate, so two measured points yield the four knots a cubic fit needs.
pub const MIN_POINTS: usize = 2;

/// One measured audiogram sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudiogramPoint {
    /// Frequency in Hz (non-negative).
    pub frequency_hz: f64,
    /// Hearing loss at that frequency in dB.
    pub loss_db: f64,
}

impl AudiogramPoint {
    /// Creates a new audiogram point.
    pub fn new(frequency_hz: f64, loss_db: f64) -> Self {
        Self {
            frequency_hz,
            loss_db,
        }
    }
}

impl From<(f64, f64)> for AudiogramPoint {
    fn from((frequency_hz, loss_db): (f64, f64)) -> Self {
        Self::new(frequency_hz, loss_db)
    }
}

/// Which ear (and therefore which stereo channel) a curve belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ear {
    Left,
    Right,
}

impl Ear {
    /// Both ears in channel order.
    pub const ALL: [Ear; 2] = [Ear::Left, Ear::Right];

    /// Channel index in interleaved stereo audio.
    pub fn channel(&self) -> usize {
        match self {
            Ear::Left => 0,
            Ear::Right => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ear::Left => "left",
            Ear::Right => "right",
        }
    }
}

impl std::fmt::Display for Ear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated two-ear audiogram.
///
/// Each ear holds at least [`MIN_POINTS`] points with distinct, finite,
/// non-negative frequencies, sorted ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Audiogram {
    left: Vec<AudiogramPoint>,
    right: Vec<AudiogramPoint>,
}

impl Audiogram {
    /// Builds an audiogram from unsorted per-ear points.
    pub fn new(
        left: impl IntoIterator<Item = AudiogramPoint>,
        right: impl IntoIterator<Item = AudiogramPoint>,
    ) -> SpecResult<Self> {
        let mut left: Vec<_> = left.into_iter().collect();
        let mut right: Vec<_> = right.into_iter().collect();

        let mut errors = Vec::new();
        validate_points(Ear::Left, &mut left, "[0]", &mut errors);
        validate_points(Ear::Right, &mut right, "[1]", &mut errors);

        if errors.is_empty() {
            Ok(Self { left, right })
        } else {
            Err(AudiogramError::Invalid(errors))
        }
    }

    /// Parses an audiogram from JSON text.
    ///
    /// Accepts `[[[f, db], ...], [[f, db], ...]]` (left, then right) or
    /// `{"left": [...], "right": [...]}`.
    pub fn from_json(json: &str) -> SpecResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        audiogram_from_value(&value).map_err(AudiogramError::Invalid)
    }

    /// Reads and parses an audiogram file.
    pub fn from_file(path: &Path) -> SpecResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AudiogramError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Points for one ear, sorted by frequency.
    pub fn points(&self, ear: Ear) -> &[AudiogramPoint] {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }

    pub fn left(&self) -> &[AudiogramPoint] {
        &self.left
    }

    pub fn right(&self) -> &[AudiogramPoint] {
        &self.right
    }

    /// Highest measured frequency over both ears.
    pub fn max_frequency(&self) -> f64 {
        self.left
            .iter()
            .chain(&self.right)
            .map(|p| p.frequency_hz)
            .fold(0.0, f64::max)
    }

    pub(crate) fn from_sorted(left: Vec<AudiogramPoint>, right: Vec<AudiogramPoint>) -> Self {
        Self { left, right }
    }
}
