//! Deletion plan: every duplicate path, one per line.
//!
//! Originals never appear. The list is meant to be fed to a separate
//! deletion step, e.g. `dupefinder scan -r dir -o plan | xargs -d '\n' rm`.

use std::io::{self, Write};

use crate::duplicates::ScanResult;

/// Write the duplicate paths of `result` in group key order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_plan<W: Write>(result: &ScanResult, writer: &mut W) -> io::Result<()> {
    for path in result.duplicate_paths() {
        writeln!(writer, "{}", path.display())?;
    }
    Ok(())
}
