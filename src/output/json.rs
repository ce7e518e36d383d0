//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "digest": "abc123...",
//!       "size": 1024,
//!       "original": "/photos/a.jpg",
//!       "duplicates": ["/photos/copy/a.jpg"]
//!     }
//!   ],
//!   "errors": [
//!     { "path": "/photos/locked.jpg", "operation": "open", "message": "..." }
//!   ],
//!   "warnings": [],
//!   "summary": {
//!     "total_files": 100,
//!     "error_files": 1,
//!     "total_size": 1048576,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "scan_duration_ms": 1234,
//!     "interrupted": false,
//!     "exit_code": 3,
//!     "exit_code_name": "DF003"
//!   }
//! }
//! ```
//!
//! Groups appear in ascending size, then digest order.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, GroupKey, ScanResult};
use crate::error::ExitCode;
use crate::scanner::{FileEntry, IoError};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// BLAKE3 digest as hexadecimal string (64 characters)
    pub digest: String,
    /// File size in bytes
    pub size: u64,
    /// File to keep
    pub original: String,
    /// Copies of `original`
    pub duplicates: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a keyed [`DuplicateGroup`].
    #[must_use]
    pub fn from_group(key: &GroupKey, group: &DuplicateGroup) -> Self {
        Self {
            digest: key.digest_hex(),
            size: key.size,
            original: path_string(&group.original),
            duplicates: group.duplicates.iter().map(|p| path_string(p)).collect(),
        }
    }
}

/// A per-file failure in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFileError {
    /// Path the operation failed on
    pub path: String,
    /// Failed operation ("stat", "open", "read", "mtime")
    pub operation: String,
    /// Underlying error message
    pub message: String,
}

impl From<&IoError> for JsonFileError {
    fn from(err: &IoError) -> Self {
        Self {
            path: path_string(&err.path),
            operation: err.op.to_string(),
            message: err.source.to_string(),
        }
    }
}

impl From<&FileEntry> for JsonFileError {
    fn from(entry: &FileEntry) -> Self {
        match &entry.error {
            Some(err) => Self::from(err),
            None => Self {
                path: path_string(&entry.path),
                operation: String::new(),
                message: String::new(),
            },
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files enumerated
    pub total_files: usize,
    /// Entries in `errors`, counting enumeration and hashing failures alike
    pub error_files: usize,
    /// Total size of all readable files in bytes
    pub total_size: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates (bytes)
    pub reclaimable_space: u64,
    /// Partial digests computed
    pub partial_digests: usize,
    /// Full digests computed
    pub full_digests: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Whether the scan was interrupted
    pub interrupted: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DF000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups in key order
    pub groups: Vec<JsonDuplicateGroup>,
    /// Files excluded from grouping
    pub errors: Vec<JsonFileError>,
    /// Non-fatal failures
    pub warnings: Vec<JsonFileError>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from a scan result and an exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use dupefinder::duplicates::ScanResult;
    /// use dupefinder::error::ExitCode;
    /// use dupefinder::output::json::JsonOutput;
    /// use std::time::Duration;
    ///
    /// let output = JsonOutput::new(&ScanResult::default(), Duration::ZERO, ExitCode::NoDuplicates);
    /// assert!(output.groups.is_empty());
    /// assert_eq!(output.summary.exit_code_name, "DF002");
    /// ```
    #[must_use]
    pub fn new(result: &ScanResult, duration: Duration, exit_code: ExitCode) -> Self {
        let stats = &result.stats;
        Self {
            groups: result
                .groups
                .iter()
                .map(|(key, group)| JsonDuplicateGroup::from_group(key, group))
                .collect(),
            errors: result.errors.iter().map(JsonFileError::from).collect(),
            warnings: result.warnings.iter().map(JsonFileError::from).collect(),
            summary: JsonSummary {
                total_files: stats.grouping.total_files,
                error_files: result.errors.len(),
                total_size: stats.grouping.total_size,
                duplicate_groups: result.groups.len(),
                duplicate_files: result.groups.values().map(DuplicateGroup::duplicate_count).sum(),
                reclaimable_space: result.reclaimable_space(),
                partial_digests: stats.partial_digests,
                full_digests: stats.full_digests,
                scan_duration_ms: duration.as_millis() as u64,
                interrupted: result.interrupted,
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
