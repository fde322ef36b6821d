//! Human-readable text output

use crate::stats::RankedEntry;
use crate::Result;
use std::io::Write;

/// Write one `token  -  count` line per entry, highest count first
pub fn write_ranking<W: Write>(out: &mut W, ranking: &[RankedEntry]) -> Result<()> {
    for entry in ranking {
        writeln!(out, "{}  -  {}", entry.token, entry.count)?;
    }
    Ok(())
}
