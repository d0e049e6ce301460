//! Run report written next to the corrected audio.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Report schema version.
pub const REPORT_VERSION: u32 = 1;

/// File name of the report inside the output folder.
pub const REPORT_FILE: &str = "report.json";

/// Summary of one `correct` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report schema version (always 1).
    pub report_version: u32,
    /// Media file that was corrected.
    pub input: PathBuf,
    /// Hex-encoded BLAKE3 hash of the audiogram file content.
    pub audiogram_hash: String,
    pub sample_rate: u32,
    /// Stereo frames per channel.
    pub frames: usize,
    /// Whether the source carried a video stream.
    pub has_video: bool,
    pub gain_boost: f64,
    /// Corrected samples clipped to the 16-bit range.
    pub saturated_samples: usize,
    /// Hex-encoded BLAKE3 hash of the corrected interleaved PCM (little-endian).
    pub pcm_hash: String,
    /// Animation frames written, if an animation was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_frames: Option<usize>,
    /// File names written to the output folder, in write order.
    pub artifacts: Vec<String>,
}

impl RunReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run report")
    }

    /// Writes the report to `dir/report.json` and returns its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(REPORT_FILE);
        fs::write(&path, self.to_json_pretty()?)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse report: {}", path.display()))
    }
}

/// Hex BLAKE3 of `bytes`.
pub fn blake3_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
