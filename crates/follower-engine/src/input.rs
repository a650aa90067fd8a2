//! Reading and shuffling the names list.

use crate::error::{EngineError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a newline-delimited names file.
///
/// Lines are trimmed and blank lines dropped.
pub fn read_names(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => EngineError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => EngineError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let names = parse_names(&contents);
    tracing::info!("Read {} names from '{}'", names.len(), path.display());
    Ok(names)
}

/// Split `contents` into trimmed, non-blank lines.
#[must_use]
pub fn parse_names(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shuffle names in place with the thread-local RNG.
pub fn shuffle_names(names: &mut [String]) {
    shuffle_names_with(names, &mut rand::thread_rng());
}

/// Shuffle names in place with a caller-supplied RNG.
pub fn shuffle_names_with<R: Rng + ?Sized>(names: &mut [String], rng: &mut R) {
    names.shuffle(rng);
}
