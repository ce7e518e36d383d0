//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text report for people
//! - JSON for automation and scripting
//! - A plain deletion plan listing duplicate paths
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::find_duplicates;
//! use dupefinder::error::ExitCode;
//! use dupefinder::output::JsonOutput;
//! use dupefinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let result = find_duplicates(walker.walk(), None);
//!
//! let output = JsonOutput::new(&result, Duration::ZERO, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod plan;
pub mod text;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError};
pub use plan::write_plan;
pub use text::TextOutput;
