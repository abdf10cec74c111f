//! `brickcheck check`: verify individual files without the repository tool

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::formats::{AssetKind, VerificationOutcome};

/// Verify each path by its suffix. Returns whether all of them passed.
pub fn execute(paths: &[PathBuf]) -> Result<bool> {
    if paths.is_empty() {
        bail!("No files given");
    }

    let mut all_passed = true;
    for path in paths {
        let (kind, outcome) = check_path(path);
        let mark = if outcome.passed {
            "✓".green()
        } else {
            all_passed = false;
            "✗".red()
        };
        println!(
            "{} {} [{}]: {}",
            mark,
            path.display(),
            kind.to_string().dimmed(),
            outcome.message
        );
    }

    Ok(all_passed)
}

/// Classify and verify one file
pub fn check_path(path: &std::path::Path) -> (AssetKind, VerificationOutcome) {
    let kind = AssetKind::classify(&path.to_string_lossy());
    (kind, kind.verify(path))
}
