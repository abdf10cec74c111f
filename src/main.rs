use anyhow::Result;
use brickcheck::commands::{check, run};
use brickcheck::config::ConfigOverrides;
use brickcheck::logging::init_tracing;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brickcheck")]
#[command(about = "Verify that fetched data bricks are present and load correctly", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every brick in the brick list (default)
    Run(RunFlags),

    /// Verify individual files by their suffix
    Check {
        /// Files or Parquet dataset directories to verify
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Default)]
struct RunFlags {
    /// Brick list, one name per line [default: list/bricks.txt]
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Failure log, recreated on every run [default: fail/failures.txt]
    #[arg(long, value_name = "PATH")]
    failures: Option<PathBuf>,

    /// Repository tool invoked as `<tool> assets <brick>` [default: biobricks]
    #[arg(long, value_name = "NAME")]
    tool: Option<String>,

    /// Seconds to wait for one asset lookup [default: 30]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Config file (defaults to ./brickcheck.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the summary as JSON instead of progress text
    #[arg(long)]
    json: bool,
}

impl From<RunFlags> for run::RunArgs {
    fn from(flags: RunFlags) -> Self {
        Self {
            config: flags.config,
            overrides: ConfigOverrides {
                catalog: flags.catalog,
                failure_log: flags.failures,
                tool: flags.tool,
                lookup_timeout_secs: flags.timeout,
            },
            json: flags.json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command.unwrap_or(Commands::Run(RunFlags::default())) {
        Commands::Run(flags) => {
            let summary = run::execute(flags.into())?;
            if !summary.all_passed() {
                std::process::exit(summary.exit_code());
            }
            Ok(())
        }
        Commands::Check { paths } => {
            if !check::execute(&paths)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "brickcheck", &mut io::stdout());
            Ok(())
        }
    }
}
