//! Size buckets, group keys, and confirmed duplicate groups.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection. Files with
//! different sizes cannot be duplicates, and most files on a real
//! filesystem have a size no other file shares, so bucketing by size removes
//! the bulk of the work before any file is opened.
//!
//! # Example
//!
//! ```
//! use dupefinder::scanner::FileEntry;
//! use dupefinder::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (buckets, unreadable, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(buckets.len(), 1);
//! assert!(unreadable.is_empty());
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::tiebreak::TieBreakPolicy;
use crate::scanner::{hash_to_hex, Digest, FileEntry, IoError};

/// Files of one size, in enumeration order.
pub type SizeBuckets = BTreeMap<u64, Vec<FileEntry>>;

/// Identity of a duplicate group: file size plus full-content digest.
///
/// Ordered by size first, then digest, so maps keyed by it iterate the same
/// way on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    /// Size in bytes shared by every member
    pub size: u64,
    /// BLAKE3 digest of the content
    pub digest: Digest,
}

impl GroupKey {
    /// Create a key.
    #[must_use]
    pub fn new(size: u64, digest: Digest) -> Self {
        Self { size, digest }
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hash_to_hex(&self.digest)
    }
}

/// Confirmed duplicate group of files.
///
/// `duplicates` is never empty: a group only exists once a second file with
/// the same content has been found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// File to keep
    pub original: PathBuf,
    /// Byte-identical copies of `original`, safe to delete
    pub duplicates: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Build a group from its members in enumeration order.
    ///
    /// Without a policy the first member is the original. With a policy the
    /// original is the member the policy ranks lowest across the whole group
    /// (ties go to the earlier member), and the rest keep their enumeration
    /// order. Timestamp failures during ranking are pushed onto `warnings`.
    ///
    /// Returns `None` for fewer than two members.
    #[must_use]
    pub fn from_members(
        mut members: Vec<PathBuf>,
        tie_break: Option<TieBreakPolicy>,
        warnings: &mut Vec<IoError>,
    ) -> Option<Self> {
        if members.len() < 2 {
            return None;
        }

        let original_idx = tie_break.map_or(0, |policy| policy.select_original(&members, warnings));
        let original = members.remove(original_idx);

        Some(Self {
            original,
            duplicates: members,
        })
    }

    /// Number of files in this group, original included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.duplicates.len() + 1
    }

    /// Always false for a materialized group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// All members, original first.
    pub fn members(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.original).chain(self.duplicates.iter())
    }

    /// Whether `path` is a member of this group.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.members().any(|p| p == path)
    }

    /// Bytes freed by deleting every duplicate of a file of `size` bytes.
    #[must_use]
    pub fn wasted_space(&self, size: u64) -> u64 {
        size * self.duplicates.len() as u64
    }
}

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of entries processed
    pub total_files: usize,
    /// Entries that arrived with an error and were set aside
    pub unreadable_files: usize,
    /// Total size of all readable files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of empty files encountered
    pub empty_files: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_buckets: usize,
}

impl GroupingStats {
    /// Percentage of readable files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        let readable = self.total_files - self.unreadable_files;
        if readable == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / readable as f64) * 100.0
        }
    }
}

/// Group files by size (Phase 1 of duplicate detection).
///
/// Entries that already carry an error are set aside in the second element
/// of the result, in input order. Only buckets holding two or more files are
/// returned; enumeration order is preserved inside each bucket. Empty files
/// are bucketed like any other size and always group with each other.
///
/// # Example
///
/// ```
/// use dupefinder::scanner::FileEntry;
/// use dupefinder::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileEntry::new(PathBuf::from("/a.txt"), 100),
///     FileEntry::new(PathBuf::from("/b.txt"), 100),
///     FileEntry::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (buckets, _, stats) = group_by_size(files);
///
/// assert_eq!(buckets.len(), 1);
/// assert_eq!(buckets[&100].len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (SizeBuckets, Vec<FileEntry>, GroupingStats) {
    let mut all_buckets = SizeBuckets::new();
    let mut unreadable = Vec::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;

        if !file.is_readable() {
            log::debug!("Setting aside unreadable entry: {}", file.path.display());
            unreadable.push(file);
            continue;
        }

        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }
        all_buckets.entry(file.size).or_default().push(file);
    }

    stats.unreadable_files = unreadable.len();
    stats.unique_sizes = all_buckets.len();

    let buckets: SizeBuckets = all_buckets
        .into_iter()
        .filter(|(size, files)| {
            if files.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!(
                    "Eliminated unique size {}: {}",
                    size,
                    files[0].path.display()
                );
                false
            } else {
                stats.potential_duplicates += files.len();
                stats.duplicate_buckets += 1;
                log::debug!(
                    "Size bucket {} bytes: {} potential duplicates",
                    size,
                    files.len()
                );
                true
            }
        })
        .collect();

    log::info!(
        "Phase 1 complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (buckets, unreadable, stats)
}
