//! Instruction file reading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a text file into trimmed lines, dropping blank ones.
///
/// A missing or unreadable file is fatal; nothing is parsed from it.
pub fn read_trimmed_lines(path: &Path) -> Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
