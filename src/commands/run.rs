//! `brickcheck run`: verify every brick in the brick list

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::assets::CommandCatalog;
use crate::brick_list::read_brick_list;
use crate::config::{ConfigOverrides, VerifyConfig};
use crate::verify::{
    run_bricks, BrickOptions, BrickReport, FailureLog, RunObserver, RunSummary,
};

/// Arguments collected from the command line
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub json: bool,
}

/// Execute the run command
pub fn execute(args: RunArgs) -> Result<RunSummary> {
    let config = VerifyConfig::load(args.config.as_deref())?.with_overrides(args.overrides)?;
    execute_with_config(&config, args.json)
}

/// Run against an already-resolved configuration
pub fn execute_with_config(config: &VerifyConfig, json: bool) -> Result<RunSummary> {
    if !config.catalog.exists() {
        bail!("{} not found", config.catalog.display());
    }

    let mut failure_log = FailureLog::fresh(&config.failure_log)?;
    let bricks = read_brick_list(&config.catalog)?;
    let catalog = CommandCatalog::new(&config.tool, config.lookup_timeout());
    let options = BrickOptions {
        generic_uses_resolved_path: config.generic_uses_resolved_path,
    };

    let mut reporter = ConsoleReporter { quiet: json };
    let summary = run_bricks(&bricks, &catalog, &mut failure_log, options, &mut reporter)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print_summary(&summary, failure_log.path());
    }

    Ok(summary)
}

/// Prints per-brick progress to stdout; when quiet only failures are
/// printed, to stderr
struct ConsoleReporter {
    quiet: bool,
}

impl RunObserver for ConsoleReporter {
    fn run_started(&mut self, total: usize) {
        if !self.quiet {
            println!("Starting verification of {total} bricks...");
        }
    }

    fn brick_started(&mut self, brick: &str) {
        if !self.quiet {
            println!("{} {}", "Verifying brick:".bold(), brick);
        }
    }

    fn brick_finished(&mut self, report: &BrickReport) {
        if self.quiet {
            if let Some(failure) = &report.failure {
                eprintln!("{} {} - {}", "FAILED:".red().bold(), report.brick, failure);
            }
            return;
        }
        if report.asset_count > 0 {
            println!("  Found {} asset file(s)", report.asset_count);
        }
        for check in report.passed_checks() {
            println!(
                "  {} {}: {}",
                "✓".green(),
                check.asset.file_name(),
                check.outcome.message
            );
        }
        match &report.failure {
            None => println!("  {} {} verification passed", "✓".green(), report.brick),
            Some(failure) => println!("{} {} - {}", "FAILED:".red().bold(), report.brick, failure),
        }
    }
}

fn print_summary(summary: &RunSummary, failure_log: &Path) {
    println!("\n{}", "Verification complete:".bold());
    println!("  {} Successful: {}", "✓".green(), summary.succeeded);
    println!("  {} Failed: {}", "✗".red(), summary.failed);

    if summary.all_passed() {
        println!("  {}", "All bricks verified successfully!".green());
    } else {
        println!("  Failed bricks recorded in {}", failure_log.display());
    }
}
