//! Verification of a single brick

use std::path::Path;

use crate::assets::{resolve_assets, AssetCatalog, AssetRef, LookupError};
use crate::formats::{AssetKind, VerificationOutcome};

/// Knobs for how assets are handed to verifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct BrickOptions {
    /// Give the generic size check the resolved path instead of the raw
    /// asset reference
    pub generic_uses_resolved_path: bool,
}

/// One asset that was checked
#[derive(Debug, Clone)]
pub struct AssetCheck {
    pub asset: AssetRef,
    pub kind: AssetKind,
    pub outcome: VerificationOutcome,
}

/// Why a brick failed
#[derive(Debug, thiserror::Error)]
pub enum BrickFailure {
    /// Lookup failed or returned nothing
    #[error("No assets found or asset lookup failed")]
    NoAssets,
    /// The asset-location map could not be fetched
    #[error("Asset location lookup failed: {0}")]
    Locations(#[source] LookupError),
    /// An asset key had no on-disk location
    #[error("Asset verification failed for {asset}: {error}")]
    Unresolved {
        asset: AssetRef,
        #[source]
        error: LookupError,
    },
    /// A format verifier rejected an asset
    #[error("Asset verification failed for {asset}: {message}")]
    Asset { asset: AssetRef, message: String },
}

/// Everything observed while verifying one brick
#[derive(Debug)]
pub struct BrickReport {
    pub brick: String,
    /// Number of assets the lookup returned
    pub asset_count: usize,
    /// Checked assets in order; a failing check is always last
    pub checks: Vec<AssetCheck>,
    pub failure: Option<BrickFailure>,
}

impl BrickReport {
    fn new(brick: &str) -> Self {
        Self {
            brick: brick.to_string(),
            asset_count: 0,
            checks: Vec::new(),
            failure: None,
        }
    }

    fn fail(mut self, failure: BrickFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// Checks that passed, in order
    pub fn passed_checks(&self) -> impl Iterator<Item = &AssetCheck> {
        self.checks.iter().filter(|check| check.outcome.passed)
    }
}

/// Verify every asset of `brick`, stopping at the first failure.
pub fn verify_brick(
    brick: &str,
    catalog: &dyn AssetCatalog,
    options: BrickOptions,
) -> BrickReport {
    let mut report = BrickReport::new(brick);

    let assets = resolve_assets(catalog, brick);
    if assets.is_empty() {
        return report.fail(BrickFailure::NoAssets);
    }
    report.asset_count = assets.len();

    let locations = match catalog.asset_locations(brick) {
        Ok(locations) => locations,
        Err(error) => return report.fail(BrickFailure::Locations(error)),
    };

    for asset in assets {
        let resolved = match locations.resolve(&asset) {
            Ok(path) => path.to_path_buf(),
            Err(error) => return report.fail(BrickFailure::Unresolved { asset, error }),
        };

        // Kind comes from the raw reference, not the resolved path
        let kind = AssetKind::classify(asset.as_str());
        let target = match kind {
            AssetKind::Generic if !options.generic_uses_resolved_path => {
                Path::new(asset.as_str()).to_path_buf()
            }
            _ => resolved,
        };

        tracing::debug!(brick, asset = %asset, %kind, target = %target.display(), "verifying asset");
        let outcome = kind.verify(&target);
        let passed = outcome.passed;
        let message = outcome.message.clone();
        report.checks.push(AssetCheck {
            asset: asset.clone(),
            kind,
            outcome,
        });

        if !passed {
            return report.fail(BrickFailure::Asset { asset, message });
        }
    }

    report
}
