//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking using jwalk (flat or recursive)
//! - Prefix and full-content hashing with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match &entry.error {
//!         None => println!("{}: {} bytes", entry.path.display(), entry.size),
//!         Some(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Re-export main types
pub use hasher::{hash_to_hex, Digest, Digester, Hasher, FULL_CHUNK_SIZE, PARTIAL_SIZE};
pub use walker::{MultiWalker, Walker};

/// A file discovered during enumeration.
///
/// Entries are immutable once created. An entry whose size could not be
/// determined carries the failure in `error` and never takes part in grouping.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes (0 when `error` is set)
    pub size: u64,
    /// Why this file could not be processed, if it could not
    pub error: Option<IoError>,
}

impl FileEntry {
    /// Create a readable entry.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            error: None,
        }
    }

    /// Create an entry for a file whose size could not be determined.
    #[must_use]
    pub fn failed(path: PathBuf, error: IoError) -> Self {
        Self {
            path,
            size: 0,
            error: Some(error),
        }
    }

    /// Copy of this entry with `error` attached.
    #[must_use]
    pub fn with_error(&self, error: IoError) -> Self {
        Self {
            path: self.path.clone(),
            size: self.size,
            error: Some(error),
        }
    }

    /// Whether this entry can take part in grouping.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.error.is_none()
    }
}

/// Configuration for directory walking.
///
/// Controls recursion, filtering, and symlink handling.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend into subdirectories. When false only the root's direct
    /// children are listed.
    pub recursive: bool,

    /// Follow symbolic links during traversal.
    /// Warning: May cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (gitignore-style).
    /// These are applied in addition to any .gitignore file in the root.
    pub ignore_patterns: Vec<String>,
}

/// The filesystem operation an [`IoError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoOp {
    /// Reading file metadata (size) or listing a directory
    Stat,
    /// Opening a file for reading
    Open,
    /// Reading file contents
    Read,
    /// Reading the modification timestamp
    Modified,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoOp::Stat => write!(f, "stat"),
            IoOp::Open => write!(f, "open"),
            IoOp::Read => write!(f, "read"),
            IoOp::Modified => write!(f, "mtime"),
        }
    }
}

/// An I/O failure on one specific path.
///
/// This is the only error the detection engine produces. It is always local
/// to a single file and never aborts a scan.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{op} failed for {path}: {source}")]
pub struct IoError {
    /// Operation that failed
    pub op: IoOp,
    /// Path where the error occurred
    pub path: PathBuf,
    /// The underlying I/O error
    #[source]
    pub source: Arc<std::io::Error>,
}

impl IoError {
    /// Wrap an `std::io::Error` for `path`.
    #[must_use]
    pub fn new(op: IoOp, path: &Path, source: std::io::Error) -> Self {
        Self {
            op,
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }

    /// Kind of the underlying I/O error.
    #[must_use]
    pub fn kind(&self) -> std::io::ErrorKind {
        self.source.kind()
    }
}
