//! HDT triple-store verification
//!
//! The reader is picked from the file's own signature rather than its name.
//! HDT is the only compressed triple-store format currently recognized.

use anyhow::{anyhow, bail, Context, Result};
use hdt::Hdt;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::{contain, VerificationOutcome};

/// Magic bytes opening every HDT file
pub const HDT_SIGNATURE: &[u8; 4] = b"$HDT";

/// Load the graph and count its triples
pub fn verify_hdt(path: &Path) -> VerificationOutcome {
    contain("Failed to load HDT file", || -> Result<VerificationOutcome> {
        let triples = count_triples(path)?;
        Ok(VerificationOutcome::from_count(
            triples,
            |n| format!("HDT file has {n} triples"),
            || "HDT file is empty (0 triples)".to_string(),
        ))
    })
}

fn count_triples(path: &Path) -> Result<u64> {
    let mut file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;

    let mut signature = [0u8; 4];
    file.read_exact(&mut signature)
        .context("file too short to carry a format signature")?;
    if &signature != HDT_SIGNATURE {
        bail!(
            "unrecognized triple store signature {:?}",
            String::from_utf8_lossy(&signature)
        );
    }
    file.seek(SeekFrom::Start(0))?;

    let hdt = Hdt::new(BufReader::new(file)).map_err(|e| anyhow!("{e}"))?;
    // ids only; translating each triple to strings would decode the dictionary
    let count = hdt.triples.into_iter().count();
    tracing::debug!(path = %path.display(), triples = count, "loaded hdt");
    Ok(count as u64)
}
