//! Curve command implementation
//!
//! Renders the attenuation curves of an audiogram without touching media.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use earshape_dsp::{EarCurves, FrequencyAxis};
use earshape_spec::{Audiogram, Ear};

use crate::render::audiogram_png;

/// Default sampling rate for curve previews.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Run the curve command
///
/// # Arguments
/// * `audiogram` - Path to the audiogram JSON
/// * `sample_rate` - Rate the curves are padded to
/// * `output` - PNG file to write
pub fn run(audiogram: &Path, sample_rate: u32, output: &Path) -> Result<ExitCode> {
    let audiogram = Audiogram::from_file(audiogram)?;
    let curves = EarCurves::from_audiogram(&audiogram, sample_rate)?;

    for ear in Ear::ALL {
        let knots: Vec<String> = curves
            .get(ear)
            .knots()
            .map(|p| format!("{}:{}", p.frequency_hz, p.loss_db))
            .collect();
        println!("  {} {:<5} {}", "->".green(), ear.as_str(), knots.join(" ").dimmed());
    }

    // 1 Hz bins up to Nyquist
    let axis = FrequencyAxis::new(sample_rate, sample_rate as usize);
    fs::write(output, audiogram_png(&curves, &axis))
        .with_context(|| format!("Failed to write plot: {}", output.display()))?;
    println!("{} Wrote {}", "ok".green(), output.display());

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{exit_code_for, EXIT_CONFIGURATION};

    #[test]
    fn test_writes_png() {
        let tmp = tempfile::tempdir().unwrap();
        let audiogram = tmp.path().join("a.json");
        fs::write(
            &audiogram,
            r#"{"left": [[250, 10], [4000, 30]], "right": [[250, 0], [4000, 20]]}"#,
        )
        .unwrap();
        let output = tmp.path().join("curve.png");

        run(&audiogram, 16000, &output).unwrap();

        let png = fs::read(&output).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_audiogram_beyond_nyquist_still_plots() {
        let tmp = tempfile::tempdir().unwrap();
        let audiogram = tmp.path().join("a.json");
        fs::write(&audiogram, "[[[250, 10], [8000, 30]], [[250, 0], [8000, 20]]]").unwrap();
        let output = tmp.path().join("curve.png");

        run(&audiogram, 4000, &output).unwrap();

        assert!(output.is_file());
    }

    #[test]
    fn test_missing_audiogram_is_configuration_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.json");

        let err = run(&missing, 16000, &tmp.path().join("curve.png")).unwrap_err();

        assert_eq!(exit_code_for(&err), EXIT_CONFIGURATION);
    }
}
