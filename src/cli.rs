//! Command-line interface definitions for dupefinder.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Scan options left unset on the command line fall back to the configuration
//! file and environment (see [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Flat scan of one directory
//! dupefinder scan ~/Downloads
//!
//! # Recursive scan, keep the oldest copy, print JSON
//! dupefinder scan -r ~/Photos --tie-break by-last-modified --output json
//!
//! # Print only the paths that could be deleted
//! dupefinder scan -r ~/Music --output plan
//!
//! # Verbose mode for debugging
//! dupefinder -v scan ~/Downloads
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::TieBreakPolicy;

/// Content-based duplicate file finder.
///
/// dupefinder groups byte-identical files using BLAKE3 digests and marks one
/// file per group as the original. It never modifies or deletes files.
#[derive(Debug, Parser)]
#[command(name = "dupefinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, value_name = "FILE", global = true, env = "DUPEFINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether errors should be reported as JSON.
    #[must_use]
    pub fn json_errors(&self) -> bool {
        match &self.command {
            Commands::Scan(args) => args.json_errors,
            Commands::Config => false,
        }
    }
}

/// Available subcommands for dupefinder.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories for duplicate files
    Scan(ScanArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan, in enumeration order
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Rule for choosing the original in each group
    ///
    /// Without a rule the first file found is the original.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub tie_break: Option<TieBreakPolicy>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (can be specified multiple times)
    ///
    /// These patterns are added to any .gitignore patterns found.
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links during scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: Option<u16>,

    /// Report errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Machine-readable JSON document
    Json,
    /// Duplicate paths only, one per line
    Plan,
}

/// Parse a human-readable size string into bytes.
///
/// # Examples
///
/// ```
/// use dupefinder::cli::parse_size;
///
/// assert_eq!(parse_size("100").unwrap(), 100);
/// assert_eq!(parse_size("1KB").unwrap(), 1_000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1_024);
/// assert_eq!(parse_size("1.5MB").unwrap(), 1_500_000);
/// ```
///
/// # Errors
///
/// Returns an error for empty input, malformed numbers, or unknown suffixes.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
