//! CLI for the plugin modernizer metadata store.
//!
//! Refreshes migration records from GitHub, consolidates them per plugin and
//! generates failure, recipe and summary reports.

use chrono::Utc;
use clap::{Parser, Subcommand};
use modernizer_metadata::{RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Plugin Modernizer Metadata - Refresh, consolidate and report on migration records.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root of the metadata store.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// GitHub Personal Access Token.
    #[arg(long, global = true, env = "GH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Refresh pull request status, check runs and default branch of every record.
    UpdateMetadata,

    /// Write each plugin's aggregated_migrations.json.
    Consolidate,

    /// Write failure CSVs, recipe rollups and the global summary.
    GenerateReports,

    /// Run update-metadata, consolidate and generate-reports in order.
    All,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    // Octocrab's TLS stack needs a process-wide crypto provider.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Log output is compact and single-line. The level is taken from `RUST_LOG`
/// and defaults to "info".
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut config = RunnerConfig::new(args.root);
    if let Some(token) = args.token {
        config = config.with_token(token);
    }
    let runner = Runner::new(config)?;

    match args.command {
        Command::UpdateMetadata => runner.update_metadata().await,
        Command::Consolidate => runner.consolidate(),
        Command::GenerateReports => runner.generate_reports(Utc::now()),
        Command::All => runner.run_all(Utc::now()).await,
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    if summary.records_processed > 0 {
        println!("  Records processed: {}", summary.records_processed);
        println!("  Records updated: {}", summary.records_updated);
        println!("  Records unchanged: {}", summary.records_unchanged);
        println!("  Records skipped: {}", summary.records_skipped);
        println!("  Records failed: {}", summary.records_failed);
    }
    if summary.records_scanned > 0 || summary.files_unreadable > 0 {
        println!("  Records scanned: {}", summary.records_scanned);
        println!("  Unreadable files: {}", summary.files_unreadable);
    }
    if summary.plugins_aggregated > 0 {
        println!("  Plugins aggregated: {}", summary.plugins_aggregated);
    }
    if summary.failure_reports > 0 || summary.recipe_reports > 0 || summary.summary_written {
        println!("  Failure reports: {}", summary.failure_reports);
        println!("  Recipe rollups: {}", summary.recipe_reports);
        println!(
            "  Summary report: {}",
            if summary.summary_written { "written" } else { "skipped" }
        );
    }
    if summary.outputs_failed > 0 {
        println!("  Outputs failed: {}", summary.outputs_failed);
    }
}
