//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing BLAKE3 digests
//! of file contents. Two digests are offered:
//!
//! - a **partial** digest over at most the first [`PARTIAL_SIZE`] bytes,
//!   used to cheaply discard non-duplicates;
//! - a **full** digest over the entire file, streamed in bounded chunks.
//!
//! Both use the same unkeyed BLAKE3 construction, so for a file of at most
//! [`PARTIAL_SIZE`] bytes the two digests are equal.
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::{Digester, Hasher, hash_to_hex};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.full_digest(Path::new("Cargo.toml")).unwrap();
//! println!("{}", hash_to_hex(&digest));
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::{IoError, IoOp};

/// Number of leading bytes covered by the partial digest.
pub const PARTIAL_SIZE: usize = 1024;

/// Read buffer size used when streaming a full digest.
pub const FULL_CHUNK_SIZE: usize = 64 * 1024;

/// A 32-byte BLAKE3 digest.
pub type Digest = [u8; 32];

/// Source of content digests for the duplicate grouper.
///
/// [`Hasher`] is the filesystem implementation. Implementations must be
/// pure functions of file content: equal bytes give equal digests, and the
/// digest must be collision resistant since equality is never re-checked
/// byte by byte.
pub trait Digester: Send + Sync {
    /// Digest of at most the first [`PARTIAL_SIZE`] bytes.
    fn partial_digest(&self, path: &Path) -> Result<Digest, IoError>;

    /// Digest of the entire file.
    fn full_digest(&self, path: &Path) -> Result<Digest, IoError>;
}

/// Streaming BLAKE3 file hasher.
///
/// Each call opens the file once and closes it before returning. Nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: FULL_CHUNK_SIZE,
        }
    }

    /// Use a different chunk size for full digests.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Chunk size used for full digests.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn open(path: &Path) -> Result<File, IoError> {
        File::open(path).map_err(|e| IoError::new(IoOp::Open, path, e))
    }

    /// Feed `reader` into `hasher` until EOF using `buf` as the chunk.
    fn stream(
        path: &Path,
        mut reader: impl Read,
        buf: &mut [u8],
        hasher: &mut blake3::Hasher,
    ) -> Result<(), IoError> {
        loop {
            match reader.read(buf) {
                Ok(0) => return Ok(()),
                Ok(n) => {
                    hasher.update(&buf[..n]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(IoError::new(IoOp::Read, path, e)),
            }
        }
    }
}

impl Digester for Hasher {
    fn partial_digest(&self, path: &Path) -> Result<Digest, IoError> {
        let file = Self::open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buf = [0u8; PARTIAL_SIZE];
        Self::stream(path, file.take(PARTIAL_SIZE as u64), &mut buf, &mut hasher)?;
        log::trace!("Partial digest computed: {}", path.display());
        Ok(*hasher.finalize().as_bytes())
    }

    fn full_digest(&self, path: &Path) -> Result<Digest, IoError> {
        let file = Self::open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buf = vec![0u8; self.buffer_size];
        Self::stream(path, file, &mut buf, &mut hasher)?;
        log::trace!("Full digest computed: {}", path.display());
        Ok(*hasher.finalize().as_bytes())
    }
}

/// Render a digest as lowercase hexadecimal (64 characters).
///
/// # Example
///
/// ```
/// use dupefinder::scanner::hash_to_hex;
///
/// let hex = hash_to_hex(&[0xab; 32]);
/// assert!(hex.starts_with("abab"));
/// assert_eq!(hex.len(), 64);
/// ```
#[must_use]
pub fn hash_to_hex(digest: &Digest) -> String {
    blake3::Hash::from(*digest).to_hex().to_string()
}
