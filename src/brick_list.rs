//! Brick list parsing
//!
//! One brick name per line. Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Extract brick names from the contents of a brick list
pub fn parse_brick_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and parse a brick list file
pub fn read_brick_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read brick list: {}", path.display()))?;
    Ok(parse_brick_list(&content))
}
