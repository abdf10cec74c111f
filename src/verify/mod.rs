//! Brick verification core
//!
//! `brick` checks one brick's assets, `run` walks a brick list and keeps the
//! tally, `failure_log` persists the names of failed bricks. None of these
//! touch the console; callers observe progress through [`RunObserver`].

pub mod brick;
pub mod failure_log;
pub mod run;

pub use brick::{verify_brick, AssetCheck, BrickFailure, BrickOptions, BrickReport};
pub use failure_log::{FailureLog, FailureSink, MemoryFailureLog};
pub use run::{run_bricks, RunObserver, RunSummary, SilentObserver};
