//! gemup - incremental Gemfile updater CLI tool
//!
//! For every gem in the Gemfile, tries the newest patch, minor and major
//! release in turn, keeping each step only when the test command passes.

use clap::Parser;
use gemup::cli::CliArgs;
use gemup::config::Settings;
use gemup::logging;
use gemup::orchestrator::Orchestrator;
use gemup::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let settings = Settings::resolve(&args)?;

    if args.verbose {
        eprintln!("gemup v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", settings.updater.manifest_path.display());
        if settings.updater.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let show_progress = !args.quiet && !args.json;
    let orchestrator = Orchestrator::new(settings)?;
    let summary = orchestrator.run(show_progress).await?;

    let formatter = create_formatter(OutputConfig::from_cli(args.json, args.verbose, args.quiet));
    let mut stdout = io::stdout().lock();
    formatter.format(&summary, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}
