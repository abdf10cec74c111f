//! Failure log: one failed brick name per line

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for failed brick names
pub trait FailureSink {
    fn record(&mut self, brick: &str) -> Result<()>;
}

/// Appends to a file, creating its directory on first write
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    /// Start a fresh log, removing whatever a previous run left behind
    pub fn fresh(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove old failure log: {}", path.display()))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FailureSink for FailureLog {
    fn record(&mut self, brick: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open failure log: {}", self.path.display()))?;
        writeln!(file, "{brick}")
            .with_context(|| format!("Failed to write failure log: {}", self.path.display()))?;
        Ok(())
    }
}

/// Keeps failures in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryFailureLog {
    pub bricks: Vec<String>,
}

impl FailureSink for MemoryFailureLog {
    fn record(&mut self, brick: &str) -> Result<()> {
        self.bricks.push(brick.to_string());
        Ok(())
    }
}
