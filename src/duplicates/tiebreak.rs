//! Tie-break policies deciding which member of a group is the original.
//!
//! Each policy is a [`TieBreak`] strategy that maps a path to an orderable
//! key; the member with the smallest key is kept as the original. Adding a
//! policy means adding a strategy and a [`TieBreakPolicy`] variant; the
//! grouping algorithm never changes.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::scanner::{IoError, IoOp};

/// Ranking strategy for original selection.
pub trait TieBreak {
    /// Ranking key. Smaller keys are preferred as original.
    type Key: Ord;

    /// Rank one path.
    fn key(&self, path: &Path) -> Result<Self::Key, IoError>;

    /// Key used when [`TieBreak::key`] fails.
    fn fallback_key(&self) -> Self::Key;
}

/// Byte-wise lexicographic order of the full path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameOrder;

impl TieBreak for NameOrder {
    type Key = OsString;

    fn key(&self, path: &Path) -> Result<Self::Key, IoError> {
        Ok(path.as_os_str().to_os_string())
    }

    fn fallback_key(&self) -> Self::Key {
        OsString::new()
    }
}

/// Oldest modification time first.
///
/// An unreadable timestamp ranks as older than any readable one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiedOrder;

impl TieBreak for ModifiedOrder {
    type Key = Option<SystemTime>;

    fn key(&self, path: &Path) -> Result<Self::Key, IoError> {
        std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map(Some)
            .map_err(|e| IoError::new(IoOp::Modified, path, e))
    }

    fn fallback_key(&self) -> Self::Key {
        None
    }
}

/// Index of the member `strategy` ranks lowest.
///
/// Equal keys keep the earlier member. Each path is ranked exactly once;
/// ranking failures are logged, pushed onto `warnings`, and replaced by the
/// strategy's fallback key.
pub fn select_original<T: TieBreak>(
    strategy: &T,
    members: &[PathBuf],
    warnings: &mut Vec<IoError>,
) -> usize {
    let mut best: Option<(usize, T::Key)> = None;

    for (idx, path) in members.iter().enumerate() {
        let key = strategy.key(path).unwrap_or_else(|e| {
            log::warn!("Tie-break fallback for {}: {}", path.display(), e);
            warnings.push(e);
            strategy.fallback_key()
        });

        match best {
            Some((_, ref current)) if key >= *current => {}
            _ => best = Some((idx, key)),
        }
    }

    best.map_or(0, |(idx, _)| idx)
}

/// Named tie-break policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreakPolicy {
    /// Keep the path that sorts first
    ByName,
    /// Keep the least recently modified file
    ByLastModified,
}

impl TieBreakPolicy {
    /// Index within `members` of the file to keep as original.
    pub fn select_original(self, members: &[PathBuf], warnings: &mut Vec<IoError>) -> usize {
        match self {
            TieBreakPolicy::ByName => select_original(&NameOrder, members, warnings),
            TieBreakPolicy::ByLastModified => select_original(&ModifiedOrder, members, warnings),
        }
    }

    /// Policy name as accepted on the command line and in config files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TieBreakPolicy::ByName => "by-name",
            TieBreakPolicy::ByLastModified => "by-last-modified",
        }
    }
}

impl fmt::Display for TieBreakPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
