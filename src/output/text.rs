//! Human-readable report of scan results.
//!
//! ```text
//! Group 1: 3 files, 2.0 KiB each (digest 3b1f...)
//!   keep    /photos/a.jpg
//!   delete  /photos/copy/a.jpg
//!   delete  /backup/a.jpg
//!
//! Errors (1):
//!   open failed for /photos/locked.jpg: Permission denied (os error 13)
//!
//! 1 duplicate groups, 2 duplicate files, 4.0 KiB reclaimable
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::ScanResult;

/// Text report writer.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    result: &'a ScanResult,
}

impl<'a> TextOutput<'a> {
    /// Create a report for `result`.
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        Self { result }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let result = self.result;

        if result.interrupted {
            writeln!(writer, "Scan interrupted, no groups reported.")?;
        }

        for (i, (key, group)) in result.groups.iter().enumerate() {
            let digest = key.digest_hex();
            writeln!(
                writer,
                "Group {}: {} files, {} each (digest {}...)",
                i + 1,
                group.len(),
                ByteSize::b(key.size),
                &digest[..8]
            )?;
            writeln!(writer, "  keep    {}", group.original.display())?;
            for dup in &group.duplicates {
                writeln!(writer, "  delete  {}", dup.display())?;
            }
            writeln!(writer)?;
        }

        if !result.errors.is_empty() {
            writeln!(writer, "Errors ({}):", result.errors.len())?;
            for entry in &result.errors {
                match &entry.error {
                    Some(err) => writeln!(writer, "  {}", err)?,
                    None => writeln!(writer, "  {}", entry.path.display())?,
                }
            }
            writeln!(writer)?;
        }

        if !result.warnings.is_empty() {
            writeln!(writer, "Warnings ({}):", result.warnings.len())?;
            for warning in &result.warnings {
                writeln!(writer, "  {}", warning)?;
            }
            writeln!(writer)?;
        }

        if result.has_duplicates() {
            let duplicate_files: usize = result.groups.values().map(|g| g.duplicate_count()).sum();
            writeln!(
                writer,
                "{} duplicate groups, {} duplicate files, {} reclaimable",
                result.groups.len(),
                duplicate_files,
                ByteSize::b(result.reclaimable_space())
            )
        } else {
            writeln!(
                writer,
                "No duplicates found among {} files.",
                result.stats.grouping.total_files
            )
        }
    }
}
