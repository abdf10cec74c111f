//! Existence and size check for files of any other kind

use std::fs;
use std::path::Path;

use super::{contain, VerificationOutcome};

/// Pass when the file exists and is not empty
pub fn verify_generic(path: &Path) -> VerificationOutcome {
    contain("Failed to check file", || {
        let size = fs::metadata(path)?.len();
        Ok::<_, std::io::Error>(VerificationOutcome::from_count(
            size,
            |n| format!("File exists and has size {n} bytes"),
            || "File is empty (0 bytes)".to_string(),
        ))
    })
}
