//! Doctor command implementation
//!
//! Checks that the transcoder can be found and run.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use crate::media::ffmpeg::{resolve_binary, FFMPEG_ENV};
use crate::media::{AdapterError, FfmpegAdapter, FfmpegConfig};

/// Run the doctor command
///
/// Checks:
/// - Version information
/// - ffmpeg resolution and version
/// - Current directory permissions
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(ffmpeg: Option<&Path>) -> Result<ExitCode> {
    println!("{}", "Earshape Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} earshape-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Dependencies:".bold());
    match check_ffmpeg(ffmpeg) {
        Ok((binary, version)) => {
            println!("  {} {} ({})", "ok".green(), version, binary);
        }
        Err(AdapterError::BinaryNotFound(reason)) => {
            println!("  {} ffmpeg not found: {}", "!!".red(), reason);
            println!(
                "     {}",
                format!("Install ffmpeg, pass --ffmpeg, or set {}.", FFMPEG_ENV).dimmed()
            );
            all_ok = false;
        }
        Err(e) => {
            println!("  {} ffmpeg check failed: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    println!("{}", "Permissions:".bold());
    match env::current_dir() {
        Ok(dir) => {
            let test_file = dir.join(".earshape_write_test");
            match std::fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = std::fs::remove_file(&test_file);
                    println!(
                        "  {} Current directory is writable ({})",
                        "ok".green(),
                        dir.display()
                    );
                }
                Err(e) => {
                    println!("  {} Cannot write to current directory: {}", "!!".red(), e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Resolves ffmpeg and reads its version banner.
fn check_ffmpeg(explicit: Option<&Path>) -> Result<(String, String), AdapterError> {
    let binary = resolve_binary(explicit)?;
    let adapter = FfmpegAdapter::new(FfmpegConfig {
        binary: binary.clone(),
    });
    let version = adapter.version()?;
    let version = if version.is_empty() {
        "ffmpeg (unknown version)".to_string()
    } else {
        version
    };
    Ok((binary.display().to_string(), version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_spawn_failure() {
        let err = check_ffmpeg(Some(Path::new("/nonexistent/earshape-ffmpeg"))).unwrap_err();
        assert!(matches!(err, AdapterError::Spawn { .. }));
    }
}
