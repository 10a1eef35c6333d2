use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use mc_directory::cli::counts::{self, CountsConfig};
use mc_directory::cli::run::{self, RunConfig, SourceFormat};
use mc_directory::tracing::init_tracing;
use mc_directory::util::env as env_util;

#[derive(Parser, Debug)]
#[command(name = "mcd", version, about = "MC directory consolidation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Consolidate one source batch into the canonical snapshot
    Run {
        /// Path to the source batch (JSON array or headered CSV)
        #[arg(long)]
        source: PathBuf,
        /// Batch format; inferred from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<SourceFormat>,
        /// Optional override for the snapshot directory
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
        /// Optional override for the fuzzy-match similarity threshold
        #[arg(long)]
        threshold: Option<f64>,
        /// Compute and report everything without persisting
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print row counts for the persisted snapshot
    Counts {
        /// Optional override for the snapshot directory
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
        /// Also print a per-state breakdown
        #[arg(long, default_value_t = false)]
        per_state: bool,
    },
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            source,
            format,
            snapshot_dir,
            threshold,
            dry_run,
        } => {
            let report = run::run(RunConfig {
                source,
                format,
                snapshot_dir,
                threshold,
                dry_run,
            })?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Counts {
            snapshot_dir,
            per_state,
        } => counts::run(CountsConfig {
            snapshot_dir,
            per_state,
        }),
    }
}

fn main() -> ExitCode {
    env_util::init_env();
    if let Err(e) = init_tracing("info") {
        eprintln!("tracing init failed: {e}");
    }

    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "run failed");
            ExitCode::FAILURE
        }
    }
}
