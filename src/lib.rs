//! dupefinder - content-based duplicate file finder
//!
//! Groups byte-identical files using BLAKE3 digests and marks one file per
//! group as the original, either the first one found or the one a
//! tie-break policy ranks lowest. Files are only ever read.
//!
//! The detection engine lives in [`duplicates`] and [`scanner`]; the other
//! modules make up the command-line application around it.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::Settings;
use crate::duplicates::{DuplicateGrouper, FinderConfig, ScanResult};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::MultiWalker;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration, missing or non-directory
/// scan roots, or failure to write output. Unreadable files inside a scan
/// are not errors; they are reported in the output and reflected in the
/// exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan(ref args) => run_scan(args, settings, cli.quiet),
        Commands::Config => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(settings.to_toml()?.as_bytes())
                .context("Failed to write configuration")?;
            Ok(ExitCode::Success)
        }
    }
}

fn run_scan(args: &ScanArgs, settings: Settings, quiet: bool) -> Result<ExitCode> {
    let settings = settings.apply_cli(args)?;
    validate_roots(&args.paths)?;

    let handler = signal::install_handler()?;
    let progress = Arc::new(Progress::new(quiet || args.output != OutputFormat::Text));
    let start_time = Instant::now();

    log::info!(
        "Starting duplicate scan of {} root(s), tie-break: {}",
        args.paths.len(),
        settings
            .tie_break
            .map_or_else(|| "first found".to_string(), |p| p.to_string())
    );

    progress.on_phase_start("walking", 0);
    let entries = MultiWalker::new(args.paths.clone(), settings.walker_config())
        .with_shutdown_flag(handler.get_flag())
        .collect();
    progress.on_phase_end("walking");
    log::info!("Found {} files", entries.len());

    let config = FinderConfig::default()
        .with_io_threads(settings.io_threads)
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(progress);
    let result = DuplicateGrouper::new(config).find_duplicates(entries, settings.tie_break);
    let exit_code = exit_code_for(&result);

    log::info!(
        "Scan finished in {:.2?}: {} groups, {} errors",
        start_time.elapsed(),
        result.groups.len(),
        result.errors.len()
    );

    let mut stdout = std::io::stdout().lock();
    match args.output {
        OutputFormat::Text => TextOutput::new(&result)
            .write_to(&mut stdout)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&result, start_time.elapsed(), exit_code)
            .write_to(&mut stdout, true)
            .context("Failed to write JSON output")?,
        OutputFormat::Plan => {
            output::write_plan(&result, &mut stdout).context("Failed to write deletion plan")?
        }
    }
    stdout.flush().context("Failed to flush output")?;

    Ok(exit_code)
}

fn validate_roots(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        if !path.exists() {
            anyhow::bail!("Path not found: {}", path.display());
        }
        if !path.is_dir() {
            anyhow::bail!("Not a directory: {}", path.display());
        }
    }
    Ok(())
}

/// Exit code for a finished scan.
///
/// Interruption wins over per-file errors, which win over the
/// duplicates/no-duplicates distinction.
#[must_use]
pub fn exit_code_for(result: &ScanResult) -> ExitCode {
    if result.interrupted {
        ExitCode::Interrupted
    } else if !result.errors.is_empty() {
        ExitCode::PartialSuccess
    } else if result.has_duplicates() {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    }
}
