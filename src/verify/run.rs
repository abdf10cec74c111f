//! Sequential verification of a brick list

use anyhow::Result;
use serde::Serialize;

use super::brick::{verify_brick, BrickOptions, BrickReport};
use super::failure_log::FailureSink;
use crate::assets::AssetCatalog;

/// Progress hooks for a run
pub trait RunObserver {
    fn run_started(&mut self, _total: usize) {}
    fn brick_started(&mut self, _brick: &str) {}
    fn brick_finished(&mut self, _report: &BrickReport) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// Pass/fail tally for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Failed bricks in the order they failed
    pub failed_bricks: Vec<String>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Verify bricks one at a time, in order.
///
/// Each failing brick is written to `sink` once, as soon as it fails. A sink
/// error aborts the run; brick failures never do.
pub fn run_bricks(
    bricks: &[String],
    catalog: &dyn AssetCatalog,
    sink: &mut dyn FailureSink,
    options: BrickOptions,
    observer: &mut dyn RunObserver,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    observer.run_started(bricks.len());

    for brick in bricks {
        observer.brick_started(brick);
        let report = verify_brick(brick, catalog, options);

        if report.passed() {
            summary.succeeded += 1;
        } else {
            sink.record(brick)?;
            summary.failed += 1;
            summary.failed_bricks.push(brick.clone());
        }

        observer.brick_finished(&report);
    }

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "verification run finished"
    );
    Ok(summary)
}
