//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory and
//! producing the [`FileEntry`] listing the duplicate grouper consumes, and
//! [`MultiWalker`] for chaining several roots.
//!
//! # Features
//!
//! - Flat (direct children only) or recursive traversal
//! - Deterministic enumeration order (children sorted by file name)
//! - Gitignore-style pattern matching via the `ignore` crate
//! - Size filtering (min/max)
//! - Hidden file filtering
//! - Graceful shutdown via atomic flag
//!
//! Files whose metadata cannot be read are still yielded, with
//! [`FileEntry::error`] set, so callers can report them.
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     min_size: Some(1024),
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), config);
//! let files: Vec<_> = walker.walk().collect();
//! println!("Found {} files", files.len());
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;

use super::{FileEntry, IoError, IoOp, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Build gitignore matcher from config patterns and .gitignore file.
    fn build_gitignore(&self) -> Option<Gitignore> {
        let mut builder = GitignoreBuilder::new(&self.root);

        let gitignore_path = self.root.join(".gitignore");
        if gitignore_path.exists() {
            if let Some(e) = builder.add(&gitignore_path) {
                log::warn!(
                    "Failed to load .gitignore from {}: {}",
                    gitignore_path.display(),
                    e
                );
            } else {
                log::debug!("Loaded .gitignore from {}", gitignore_path.display());
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if gitignore.is_empty() => None,
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Check a file size against the configured bounds.
    fn passes_size_filter(&self, size: u64) -> bool {
        if self.config.min_size.is_some_and(|min| size < min) {
            return false;
        }
        if self.config.max_size.is_some_and(|max| size > max) {
            return false;
        }
        true
    }

    /// Walk the directory and yield one entry per regular file.
    ///
    /// Directory read failures and metadata failures surface as entries with
    /// `error` set; they never end the walk.
    pub fn walk(&self) -> impl Iterator<Item = FileEntry> + '_ {
        let gitignore = self.build_gitignore();
        let prune_root = self.root.clone();
        let prune_ignore = gitignore.clone();

        let mut walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(self.config.skip_hidden)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });

                // Do not descend into ignored directories
                for child in children.iter_mut().flatten() {
                    if child.file_type().is_dir()
                        && is_ignored(&prune_root, &child.path(), true, prune_ignore.as_ref())
                    {
                        log::trace!("Ignoring directory: {}", child.path().display());
                        child.read_children_path = None;
                    }
                }
            });

        if !self.config.recursive {
            walk_dir = walk_dir.max_depth(1);
        }

        walk_dir.into_iter().filter_map(move |entry_result| {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entry_result {
                Ok(entry) => {
                    let path = entry.path();
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    if is_ignored(&self.root, &path, false, gitignore.as_ref()) {
                        log::trace!("Ignoring file: {}", path.display());
                        return None;
                    }

                    if file_type.is_symlink() && !self.config.follow_symlinks {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    self.process_file(path)
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    let source = std::io::Error::other(e.to_string());
                    Some(FileEntry::failed(
                        path.clone(),
                        IoError::new(IoOp::Stat, &path, source),
                    ))
                }
            }
        })
    }

    /// Stat a file and turn it into an entry, applying size filters.
    fn process_file(&self, path: PathBuf) -> Option<FileEntry> {
        let metadata = if self.config.follow_symlinks {
            std::fs::metadata(&path)
        } else {
            std::fs::symlink_metadata(&path)
        };

        let metadata = match metadata {
            Ok(m) => m,
            Err(e) => {
                log::warn!("Cannot stat {}: {}", path.display(), e);
                let error = IoError::new(IoOp::Stat, &path, e);
                return Some(FileEntry::failed(path, error));
            }
        };

        if !metadata.is_file() {
            return None;
        }

        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                path.display()
            );
            return None;
        }

        Some(FileEntry::new(path, size))
    }
}

/// Gitignore matching expects paths relative to the root with forward slashes.
fn is_ignored(root: &Path, path: &Path, is_dir: bool, gitignore: Option<&Gitignore>) -> bool {
    let Some(gi) = gitignore else {
        return false;
    };
    let relative_path = path.strip_prefix(root).unwrap_or(path);
    let path_str = relative_path.to_string_lossy();
    let normalized_path = if cfg!(windows) {
        path_str.replace('\\', "/")
    } else {
        path_str.into_owned()
    };

    gi.matched(normalized_path, is_dir).is_ignore()
}

/// Walks several roots one after another, in the order given.
///
/// A root listed twice is walked once. In recursive mode a root nested
/// inside an earlier root is skipped since its files are already covered.
#[derive(Debug)]
pub struct MultiWalker {
    roots: Vec<PathBuf>,
    config: WalkerConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl MultiWalker {
    /// Create a walker over `roots`.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            roots,
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Roots that will actually be walked, after overlap removal.
    #[must_use]
    pub fn effective_roots(&self) -> Vec<PathBuf> {
        let mut kept: Vec<(PathBuf, PathBuf)> = Vec::new();

        for root in &self.roots {
            let canonical = root.canonicalize().unwrap_or_else(|_| root.clone());
            let covered = kept.iter().any(|(_, earlier)| {
                if self.config.recursive {
                    canonical.starts_with(earlier)
                } else {
                    canonical == *earlier
                }
            });

            if covered {
                log::info!("Skipping {}: already covered by another root", root.display());
            } else {
                kept.push((root.clone(), canonical));
            }
        }

        kept.into_iter().map(|(root, _)| root).collect()
    }

    /// Collect every entry from every effective root, in root order.
    ///
    /// A file reached through more than one root is kept at its first
    /// position only.
    #[must_use]
    pub fn collect(&self) -> Vec<FileEntry> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        for root in self.effective_roots() {
            let mut walker = Walker::new(&root, self.config.clone());
            if let Some(ref flag) = self.shutdown_flag {
                walker = walker.with_shutdown_flag(Arc::clone(flag));
            }
            log::debug!("Walking {}", root.display());
            for entry in walker.walk() {
                let key = entry.path.canonicalize().unwrap_or_else(|_| entry.path.clone());
                if seen.insert(key) {
                    entries.push(entry);
                } else {
                    log::trace!("Already listed: {}", entry.path.display());
                }
            }
        }
        entries
    }
}
