//! JSON output formatting
//!
//! ```json
//! {
//!   "style": "dataspace",
//!   "entries": [
//!     { "token": "fox", "count": 2 }
//!   ]
//! }
//! ```

use crate::coordinator::Style;
use crate::stats::RankedEntry;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Top-level JSON document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonReport {
    pub style: Style,
    pub entries: Vec<RankedEntry>,
}

impl JsonReport {
    pub fn new(style: Style, ranking: &[RankedEntry]) -> Self {
        Self {
            style,
            entries: ranking.to_vec(),
        }
    }
}

/// Write the ranking as a pretty-printed JSON document
pub fn write_report<W: Write>(out: &mut W, style: Style, ranking: &[RankedEntry]) -> Result<()> {
    let report = JsonReport::new(style, ranking);
    serde_json::to_writer_pretty(&mut *out, &report).context("Failed to serialize JSON report")?;
    writeln!(out)?;
    Ok(())
}
