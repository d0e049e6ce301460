//! CLI command implementations

pub mod correct;
pub mod curve;
pub mod doctor;

use std::fs;
use std::path::{Path, PathBuf};

use earshape_dsp::DspError;
use earshape_spec::{Audiogram, AudiogramError};
use thiserror::Error;

use crate::media::AdapterError;
use crate::report::blake3_hex;

/// Exit status for unexpected failures.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status for bad inputs or settings.
pub const EXIT_CONFIGURATION: u8 = 2;
/// Exit status when the user declines to reuse the output folder.
pub const EXIT_DECLINED: u8 = 2;
/// Exit status when the transcoder fails.
pub const EXIT_ADAPTER: u8 = 4;

/// Invalid command inputs detected before any work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("input media not found: {}", .0.display())]
    InputNotFound(PathBuf),
}

/// Maps an error to the process exit status by walking its cause chain.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.downcast_ref::<AdapterError>().is_some() {
            return EXIT_ADAPTER;
        }
        if cause.downcast_ref::<AudiogramError>().is_some()
            || cause.downcast_ref::<ConfigError>().is_some()
        {
            return EXIT_CONFIGURATION;
        }
        if let Some(dsp) = cause.downcast_ref::<DspError>() {
            if dsp.is_configuration() {
                return EXIT_CONFIGURATION;
            }
        }
    }
    EXIT_FAILURE
}

/// Loads an audiogram and hashes the file content.
pub(crate) fn load_audiogram(path: &Path) -> Result<(Audiogram, String), AudiogramError> {
    let text = fs::read_to_string(path).map_err(|source| AudiogramError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let audiogram = Audiogram::from_json(&text)?;
    Ok((audiogram, blake3_hex(text.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Stage;
    use anyhow::Context;

    #[test]
    fn test_exit_code_adapter() {
        let err = Err::<(), _>(AdapterError::NonZeroExit {
            stage: Stage::Extract,
            code: 1,
            stdout: String::new(),
            stderr: "boom".into(),
        })
        .context("Failed to extract audio")
        .unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_ADAPTER);
    }

    #[test]
    fn test_exit_code_configuration() {
        let err = anyhow::Error::new(ConfigError::InputNotFound(PathBuf::from("x.mp4")));
        assert_eq!(exit_code_for(&err), EXIT_CONFIGURATION);

        let err = anyhow::Error::new(DspError::TooFewKnots { count: 3 });
        assert_eq!(exit_code_for(&err), EXIT_CONFIGURATION);

        let err = Audiogram::from_json("[]").map_err(anyhow::Error::new).unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_CONFIGURATION);
    }

    #[test]
    fn test_exit_code_other() {
        let err = anyhow::Error::new(DspError::EmptySignal);
        assert_eq!(exit_code_for(&err), EXIT_FAILURE);
        assert_eq!(exit_code_for(&anyhow::anyhow!("disk full")), EXIT_FAILURE);
    }

    #[test]
    fn test_load_audiogram_missing_file() {
        let err = load_audiogram(Path::new("/nonexistent/audiogram.json")).unwrap_err();
        assert!(matches!(err, AudiogramError::Io { .. }));
    }
}
