//! In-memory asset catalog for dry runs and tests

use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;

use super::{AssetCatalog, AssetLocations, AssetRef, LookupError};

#[derive(Debug, Clone, Default)]
struct StaticBrick {
    assets: Vec<AssetRef>,
    locations: AssetLocations,
}

/// Catalog answering from a fixed table. Unknown bricks fail the lookup the
/// way the repository tool does, with a non-zero exit.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    bricks: HashMap<String, StaticBrick>,
    location_lookups: Cell<usize>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a brick from `(key, path)` pairs, producing `key: path`
    /// references exactly as the repository tool prints them.
    pub fn with_brick<I, K, P>(mut self, brick: &str, assets: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<Path>,
    {
        let mut entry = StaticBrick::default();
        for (key, path) in assets {
            let key = key.into();
            let path = path.as_ref();
            entry
                .assets
                .push(AssetRef::new(format!("{key}: {}", path.display())));
            entry.locations.insert(key, path);
        }
        self.bricks.insert(brick.to_string(), entry);
        self
    }

    /// Register a brick with hand-built references and locations
    pub fn with_entries(
        mut self,
        brick: &str,
        assets: Vec<AssetRef>,
        locations: AssetLocations,
    ) -> Self {
        self.bricks
            .insert(brick.to_string(), StaticBrick { assets, locations });
        self
    }

    /// How many times a location map was requested
    pub fn location_lookups(&self) -> usize {
        self.location_lookups.get()
    }

    fn brick(&self, brick: &str) -> Result<&StaticBrick, LookupError> {
        self.bricks.get(brick).ok_or_else(|| LookupError::Failed {
            exit_code: Some(1),
            stderr: format!("brick '{brick}' is not installed"),
        })
    }
}

impl AssetCatalog for StaticCatalog {
    fn list_assets(&self, brick: &str) -> Result<Vec<AssetRef>, LookupError> {
        Ok(self.brick(brick)?.assets.clone())
    }

    fn asset_locations(&self, brick: &str) -> Result<AssetLocations, LookupError> {
        self.location_lookups.set(self.location_lookups.get() + 1);
        Ok(self.brick(brick)?.locations.clone())
    }
}
