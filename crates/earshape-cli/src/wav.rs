//! 16-bit stereo WAV reading and writing.

use std::path::Path;

use anyhow::{bail, Context, Result};
use earshape_dsp::StereoPcm;

/// Reads a 16-bit integer stereo WAV.
pub fn read_stereo(path: &Path) -> Result<StereoPcm> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    if spec.channels != 2 {
        bail!(
            "{}: expected 2 channels, found {}",
            path.display(),
            spec.channels
        );
    }
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        bail!(
            "{}: expected 16-bit integer samples, found {}-bit {:?}",
            path.display(),
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<i16>, _>>()
        .with_context(|| format!("Failed to decode samples from {}", path.display()))?;

    StereoPcm::from_interleaved(spec.sample_rate, &samples)
        .with_context(|| format!("Invalid stereo data in {}", path.display()))
}

/// Writes interleaved 16-bit stereo samples.
pub fn write_stereo(path: &Path, sample_rate: u32, interleaved: &[i16]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for &sample in interleaved {
        writer.write_sample(sample)?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {}", path.display()))?;
    Ok(())
}
