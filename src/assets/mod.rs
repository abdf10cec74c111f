//! Asset lookup for bricks
//!
//! The repository tool owns brick metadata. This module asks it which asset
//! files a brick has and where each one lives on disk.
//!
//! # Output format
//!
//! `<tool> assets <brick>` prints one asset per line:
//!
//! ```text
//! chembl_parquet: /data/bricks/chembl/brick/chembl.parquet
//! chembl_sqlite: /data/bricks/chembl/brick/chembl.sqlite
//! ```
//!
//! Each full line is an [`AssetRef`]. The text before the first `:` is the
//! asset key; the text after it is the on-disk location.
//!
//! # Failure collapsing
//!
//! [`AssetCatalog`] implementations report typed [`LookupError`]s.
//! [`resolve_assets`] folds every error into an empty list so the brick
//! verifier only ever sees "assets" or "no assets".

mod command;
mod executor;
mod memory;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub use command::CommandCatalog;
pub use executor::{run_tool, ToolOutput};
pub use memory::StaticCatalog;

/// Errors raised while asking the repository tool about a brick
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lookup exited with {}: {stderr}", describe_exit(.exit_code))]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("lookup timed out after {secs}s")]
    TimedOut { secs: u64 },

    #[error("no location known for asset key '{key}'")]
    UnknownKey { key: String },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// One asset line as reported by the repository tool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `:`, or the whole reference if there is none
    pub fn key(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }

    /// Last path component of the reference, for display
    pub fn file_name(&self) -> &str {
        Path::new(&self.0)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Asset key to on-disk path, for one brick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetLocations {
    paths: BTreeMap<String, PathBuf>,
}

impl AssetLocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(key.into(), path.into());
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Resolve an asset reference through its key
    pub fn resolve(&self, asset: &AssetRef) -> Result<&Path, LookupError> {
        self.paths
            .get(asset.key())
            .map(PathBuf::as_path)
            .ok_or_else(|| LookupError::UnknownKey {
                key: asset.key().to_string(),
            })
    }
}

impl<K: Into<String>, P: Into<PathBuf>> FromIterator<(K, P)> for AssetLocations {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut locations = Self::new();
        for (key, path) in iter {
            locations.insert(key, path);
        }
        locations
    }
}

/// Source of asset information for bricks
pub trait AssetCatalog {
    /// Asset references for `brick`, in the order the repository reports them
    fn list_assets(&self, brick: &str) -> Result<Vec<AssetRef>, LookupError>;

    /// Key-to-path map for the assets of `brick`
    fn asset_locations(&self, brick: &str) -> Result<AssetLocations, LookupError>;
}

/// List a brick's assets, treating any lookup failure as "no assets".
pub fn resolve_assets(catalog: &dyn AssetCatalog, brick: &str) -> Vec<AssetRef> {
    match catalog.list_assets(brick) {
        Ok(assets) => assets,
        Err(err) => {
            tracing::warn!(brick, error = %err, "asset lookup failed");
            Vec::new()
        }
    }
}

/// Split tool output into asset references, dropping blank lines
pub fn parse_asset_lines(output: &str) -> Vec<AssetRef> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(AssetRef::from)
        .collect()
}

/// Build the location map from `<key>: <path>` lines.
///
/// A line without `:` is a bare path and is its own location. Lines with a
/// key but nothing after the `:` are skipped.
pub fn parse_asset_locations(output: &str) -> AssetLocations {
    parse_asset_lines(output)
        .iter()
        .filter_map(|asset| match asset.as_str().split_once(':') {
            Some((key, path)) => {
                let path = path.trim();
                (!path.is_empty()).then(|| (key.to_string(), PathBuf::from(path)))
            }
            None => Some((asset.to_string(), PathBuf::from(asset.as_str()))),
        })
        .collect()
}
