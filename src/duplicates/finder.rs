//! Duplicate grouper with multi-phase detection.
//!
//! # Overview
//!
//! A scan runs in three phases:
//! 1. **Size grouping**: bucket files by size (see [`crate::duplicates::groups`])
//! 2. **Partial digest**: hash the first [`PARTIAL_SIZE`] bytes of every
//!    file in a bucket of two or more
//! 3. **Full digest**: hash the entire content of every such file larger
//!    than [`PARTIAL_SIZE`]; smaller files are fully covered by phase 2
//!
//! Digests are computed on a bounded thread pool. Grouping itself always
//! runs on the calling thread and consumes digests in enumeration order, so
//! the result is identical to a sequential scan regardless of which hash
//! finishes first.
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::{DuplicateGrouper, FinderConfig, TieBreakPolicy};
//! use dupefinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let grouper = DuplicateGrouper::new(FinderConfig::default().with_io_threads(2));
//! let result = grouper.find_duplicates(walker.walk(), Some(TieBreakPolicy::ByName));
//!
//! for (key, group) in &result.groups {
//!     println!("{} ({} bytes)", group.original.display(), key.size);
//!     for dup in &group.duplicates {
//!         println!("  {}", dup.display());
//!     }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::groups::{group_by_size, DuplicateGroup, GroupKey, GroupingStats};
use super::tiebreak::TieBreakPolicy;
use crate::progress::ProgressCallback;
use crate::scanner::{Digest, Digester, FileEntry, Hasher, IoError, PARTIAL_SIZE};

/// Configuration for the duplicate grouper.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of I/O threads used for hashing.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics for a completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Statistics from size grouping
    pub grouping: GroupingStats,
    /// Partial digests computed successfully
    pub partial_digests: usize,
    /// Full digests computed successfully
    pub full_digests: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of files that are duplicates of an original
    pub duplicate_files: usize,
    /// Bytes freed by deleting every duplicate
    pub reclaimable_bytes: u64,
}

/// Output of one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Duplicate groups keyed by size and content digest
    pub groups: BTreeMap<GroupKey, DuplicateGroup>,
    /// Files excluded from grouping because of an I/O error
    pub errors: Vec<FileEntry>,
    /// Non-fatal failures that did not exclude a file (tie-break timestamps)
    pub warnings: Vec<IoError>,
    /// Scan statistics
    pub stats: ScanStats,
    /// Whether the scan stopped early on a shutdown request
    pub interrupted: bool,
}

impl ScanResult {
    /// Whether at least one duplicate group was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Every duplicate path in group key order: the deletion plan.
    ///
    /// Originals are never included.
    pub fn duplicate_paths(&self) -> impl Iterator<Item = &Path> {
        self.groups
            .values()
            .flat_map(|g| g.duplicates.iter().map(|p| p.as_path()))
    }

    /// Bytes freed by deleting every duplicate.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.groups
            .iter()
            .map(|(key, group)| group.wasted_space(key.size))
            .sum()
    }
}

/// Duplicate grouper over any [`Digester`].
pub struct DuplicateGrouper<D: Digester = Hasher> {
    config: FinderConfig,
    digester: D,
}

impl DuplicateGrouper<Hasher> {
    /// Create a grouper hashing with BLAKE3.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self::with_digester(config, Hasher::new())
    }

    /// Create a grouper with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }
}

impl<D: Digester> DuplicateGrouper<D> {
    /// Create a grouper with a custom digest source.
    #[must_use]
    pub fn with_digester(config: FinderConfig, digester: D) -> Self {
        Self { config, digester }
    }

    /// Group `entries` by content.
    ///
    /// Entries carrying an error, and files whose digest could not be
    /// computed, are returned in [`ScanResult::errors`] and take part in no
    /// group. Without a tie-break policy the first file in enumeration order
    /// is the original of its group.
    ///
    /// The scan never fails. A shutdown request yields a result with
    /// `interrupted` set and no groups.
    pub fn find_duplicates(
        &self,
        entries: impl IntoIterator<Item = FileEntry>,
        tie_break: Option<TieBreakPolicy>,
    ) -> ScanResult {
        let (buckets, unreadable, grouping) = group_by_size(entries);
        let mut result = ScanResult {
            errors: unreadable,
            stats: ScanStats {
                grouping,
                ..Default::default()
            },
            ..Default::default()
        };

        if self.config.is_shutdown_requested() {
            return interrupted(result);
        }

        // Ascending size, enumeration order within a size
        let files: Vec<FileEntry> = buckets.into_values().flatten().collect();
        if files.is_empty() {
            log::info!("No potential duplicates found after size grouping");
            return result;
        }

        let Some(partials) = self.compute_partials(&files) else {
            return interrupted(result);
        };
        let Some(mut fulls) = self.prefetch_fulls(&files, &partials) else {
            return interrupted(result);
        };

        let mut members: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();

        // Every digest is computed by now; grouping runs to completion
        for (index, (file, partial)) in files.iter().zip(partials).enumerate() {
            let partial = match partial {
                Ok(digest) => digest,
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    result.errors.push(file.with_error(e));
                    continue;
                }
            };
            result.stats.partial_digests += 1;

            let full = if file.size <= PARTIAL_SIZE as u64 {
                partial
            } else {
                let digest = fulls
                    .remove(&index)
                    .unwrap_or_else(|| self.digester.full_digest(&file.path));
                match digest {
                    Ok(digest) => {
                        result.stats.full_digests += 1;
                        digest
                    }
                    Err(e) => {
                        log::warn!("Failed to hash {}: {}", file.path.display(), e);
                        result.errors.push(file.with_error(e));
                        continue;
                    }
                }
            };

            members
                .entry(GroupKey::new(file.size, full))
                .or_default()
                .push(index);
        }

        for (key, indices) in members {
            let paths = indices.iter().map(|&i| files[i].path.clone()).collect();
            if let Some(group) = DuplicateGroup::from_members(paths, tie_break, &mut result.warnings)
            {
                log::debug!(
                    "Duplicate group {} ({} bytes): {} files, original {}",
                    key.digest_hex(),
                    key.size,
                    group.len(),
                    group.original.display()
                );
                result.stats.duplicate_groups += 1;
                result.stats.duplicate_files += group.duplicate_count();
                result.stats.reclaimable_bytes += group.wasted_space(key.size);
                result.groups.insert(key, group);
            }
        }

        log::info!(
            "Phase 3 complete: {} duplicate groups, {} duplicate files, {} errors",
            result.stats.duplicate_groups,
            result.stats.duplicate_files,
            result.errors.len()
        );

        result
    }

    /// Partial digest of every file, in `files` order.
    ///
    /// Returns `None` when a shutdown was requested.
    fn compute_partials(&self, files: &[FileEntry]) -> Option<Vec<Result<Digest, IoError>>> {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("partial", files.len());
        }

        log::info!("Phase 2: Computing partial digests for {} files", files.len());

        let partials: Option<Vec<_>> = self.run_io(|| {
            files
                .par_iter()
                .enumerate()
                .map(|(idx, file)| {
                    if self.config.is_shutdown_requested() {
                        log::debug!("Phase 2: Shutdown requested, skipping remaining files");
                        return None;
                    }
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(idx + 1, file.path.to_string_lossy().as_ref());
                    }
                    Some(self.digester.partial_digest(&file.path))
                })
                .collect()
        });

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("partial");
        }

        if partials.is_none() {
            log::info!("Phase 2: Interrupted by shutdown signal");
        }
        partials
    }

    /// Full digest of every file larger than [`PARTIAL_SIZE`] whose partial
    /// digest succeeded, keyed by index into `files`.
    ///
    /// Returns `None` when a shutdown was requested.
    fn prefetch_fulls(
        &self,
        files: &[FileEntry],
        partials: &[Result<Digest, IoError>],
    ) -> Option<HashMap<usize, Result<Digest, IoError>>> {
        let wanted: Vec<usize> = files
            .iter()
            .zip(partials)
            .enumerate()
            .filter(|(_, (file, partial))| partial.is_ok() && file.size > PARTIAL_SIZE as u64)
            .map(|(idx, _)| idx)
            .collect();

        log::info!(
            "Phase 2 complete: {} files → {} need a full digest",
            files.len(),
            wanted.len()
        );

        if wanted.is_empty() {
            return Some(HashMap::new());
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("full", wanted.len());
        }

        log::info!("Phase 3: Computing full digests for {} files", wanted.len());

        let fulls: Option<HashMap<_, _>> = self.run_io(|| {
            wanted
                .par_iter()
                .enumerate()
                .map(|(n, &idx)| {
                    if self.config.is_shutdown_requested() {
                        log::debug!("Phase 3: Shutdown requested, skipping remaining files");
                        return None;
                    }
                    let file = &files[idx];
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(n + 1, file.path.to_string_lossy().as_ref());
                    }
                    let digest = self.digester.full_digest(&file.path);
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_item_completed(file.size);
                    }
                    Some((idx, digest))
                })
                .collect()
        });

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("full");
        }

        if fulls.is_none() {
            log::info!("Phase 3: Interrupted by shutdown signal");
        }
        fulls
    }

    /// Run `op` on a pool limited to `io_threads` threads.
    fn run_io<T, F>(&self, op: F) -> T
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
        {
            Ok(pool) => pool.install(op),
            Err(e) => {
                log::warn!(
                    "Failed to create I/O thread pool ({}), using global pool with {} threads",
                    e,
                    rayon::current_num_threads()
                );
                op()
            }
        }
    }
}

fn interrupted(mut result: ScanResult) -> ScanResult {
    log::info!("Scan interrupted, discarding partial groups");
    result.groups.clear();
    result.interrupted = true;
    result
}

/// Group `entries` with the default BLAKE3 grouper.
///
/// # Example
///
/// ```no_run
/// use dupefinder::duplicates::find_duplicates;
/// use dupefinder::scanner::{Walker, WalkerConfig};
/// use std::path::Path;
///
/// let walker = Walker::new(Path::new("."), WalkerConfig::default());
/// let result = find_duplicates(walker.walk(), None);
/// println!("{} groups, {} errors", result.groups.len(), result.errors.len());
/// ```
pub fn find_duplicates(
    entries: impl IntoIterator<Item = FileEntry>,
    tie_break: Option<TieBreakPolicy>,
) -> ScanResult {
    DuplicateGrouper::with_defaults().find_duplicates(entries, tie_break)
}
