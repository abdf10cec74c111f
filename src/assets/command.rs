//! Asset catalog backed by the repository tool's `assets` command

use std::time::Duration;

use super::executor::run_tool;
use super::{
    parse_asset_lines, parse_asset_locations, AssetCatalog, AssetLocations, AssetRef, LookupError,
};

/// Shells out to `<tool> assets <brick>` with a bounded timeout
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    tool: String,
    timeout: Duration,
}

impl CommandCatalog {
    pub fn new(tool: impl Into<String>, timeout: Duration) -> Self {
        let tool = tool.into();
        if which::which(&tool).is_err() {
            tracing::warn!(tool = %tool, "repository tool not found on PATH; every lookup will fail");
        }
        Self { tool, timeout }
    }

    fn assets_output(&self, brick: &str) -> Result<String, LookupError> {
        tracing::debug!(tool = %self.tool, brick, "listing assets");
        run_tool(&self.tool, &["assets", brick], self.timeout)?.into_stdout(self.timeout)
    }
}

impl AssetCatalog for CommandCatalog {
    fn list_assets(&self, brick: &str) -> Result<Vec<AssetRef>, LookupError> {
        let output = self.assets_output(brick)?;
        Ok(parse_asset_lines(&output))
    }

    fn asset_locations(&self, brick: &str) -> Result<AssetLocations, LookupError> {
        let output = self.assets_output(brick)?;
        Ok(parse_asset_locations(&output))
    }
}
