//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Partial digest comparison (Phase 2)
//! - Full digest comparison (Phase 3)
//! - Original selection through tie-break policies

pub mod finder;
pub mod groups;
pub mod tiebreak;

pub use finder::{find_duplicates, DuplicateGrouper, FinderConfig, ScanResult, ScanStats};
pub use groups::{group_by_size, DuplicateGroup, GroupKey, GroupingStats, SizeBuckets};
pub use tiebreak::{ModifiedOrder, NameOrder, TieBreak, TieBreakPolicy};
