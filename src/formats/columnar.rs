//! Parquet verification from footer metadata

use anyhow::{Context, Result};
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::{Path, PathBuf};

use super::{contain, VerificationOutcome};

/// Name prefixes that mark files and directories as not part of a dataset
const IGNORED_PREFIXES: &[char] = &['_', '.'];

/// Count rows across a Parquet file or a directory of fragments.
///
/// Only footers are read; no column data is scanned.
pub fn verify_parquet(path: &Path) -> VerificationOutcome {
    contain("Failed to load parquet file", || -> Result<VerificationOutcome> {
        let mut total_rows: i64 = 0;
        for fragment in parquet_fragments(path)? {
            total_rows += fragment_rows(&fragment)?;
        }
        Ok(VerificationOutcome::from_count(
            u64::try_from(total_rows).unwrap_or(0),
            |n| format!("Parquet file has {n} rows"),
            || format!("Parquet file is empty ({total_rows} rows)"),
        ))
    })
}

/// Fragment files making up a dataset, in sorted order.
///
/// A plain file is its own single fragment. Under a directory, every regular
/// file counts unless it, or a directory between it and the root, has a name
/// starting with `_` or `.` (e.g. `_SUCCESS`, `_metadata`, `.crc` files).
pub fn parquet_fragments(path: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("cannot access {}", path.display()))?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&path.to_string_lossy())
    );
    let mut fragments: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| anyhow::anyhow!("Invalid fragment pattern '{pattern}': {e}"))?
        .filter_map(|entry| entry.ok())
        .filter(|candidate| candidate.is_file())
        .filter(|candidate| !is_ignored(path, candidate))
        .collect();
    fragments.sort();

    tracing::debug!(dataset = %path.display(), fragments = fragments.len(), "discovered parquet fragments");
    Ok(fragments)
}

fn is_ignored(root: &Path, candidate: &Path) -> bool {
    candidate
        .strip_prefix(root)
        .map(|relative| {
            relative.components().any(|component| {
                component
                    .as_os_str()
                    .to_string_lossy()
                    .starts_with(IGNORED_PREFIXES)
            })
        })
        .unwrap_or(false)
}

fn fragment_rows(fragment: &Path) -> Result<i64> {
    let file = File::open(fragment)
        .with_context(|| format!("cannot open {}", fragment.display()))?;
    let reader = SerializedFileReader::new(file)
        .with_context(|| format!("invalid parquet footer in {}", fragment.display()))?;
    Ok(reader.metadata().file_metadata().num_rows())
}
