//! Output folder preparation and overwrite confirmation.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Question asked before reusing an existing output folder.
pub const OVERWRITE_QUESTION: &str =
    "Output folder already exists, there could be some data overwritten, continue? (Y/N) ";

/// Answers that accept the overwrite.
const AFFIRMATIVE: [&str; 4] = ["Y", "y", "yes", "YES"];

/// Outcome of preparing the output folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDir {
    /// The folder did not exist and was created.
    Created,
    /// The folder existed and the user agreed to reuse it.
    Reused,
    /// The folder existed and the user declined.
    Declined,
}

impl OutputDir {
    pub fn proceed(self) -> bool {
        !matches!(self, OutputDir::Declined)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE.contains(&answer.trim())
}

/// Asks the overwrite question on `output` and reads one line from `input`.
///
/// End of input counts as a refusal.
pub fn confirm_overwrite<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{}", OVERWRITE_QUESTION)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}

/// Creates `dir`, or asks before reusing it when it already exists.
///
/// Nothing inside an existing folder is touched here.
pub fn prepare_output_dir<R: BufRead, W: Write>(
    dir: &Path,
    assume_yes: bool,
    input: &mut R,
    output: &mut W,
) -> io::Result<OutputDir> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(OutputDir::Created);
    }
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", dir.display()),
        ));
    }
    if assume_yes || confirm_overwrite(input, output)? {
        Ok(OutputDir::Reused)
    } else {
        Ok(OutputDir::Declined)
    }
}
