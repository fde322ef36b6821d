//! Output formatting
//!
//! Rankings are written either as plain `token  -  count` lines or as a
//! single JSON document.

pub mod json;
pub mod text;

use crate::coordinator::Style;
use crate::stats::RankedEntry;
use crate::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// How the ranking is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `token  -  count` line per entry
    #[default]
    Text,
    /// A `{style, entries}` document
    Json,
}

/// Write `ranking` to `out` in the chosen format
pub fn write_ranking<W: Write>(
    out: &mut W,
    format: OutputFormat,
    style: Style,
    ranking: &[RankedEntry],
) -> Result<()> {
    match format {
        OutputFormat::Text => text::write_ranking(out, ranking),
        OutputFormat::Json => json::write_report(out, style, ranking),
    }
}

/// Print `ranking` to stdout in the chosen format
pub fn print_ranking(format: OutputFormat, style: Style, ranking: &[RankedEntry]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_ranking(&mut out, format, style, ranking)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_format() {
        let ranking = vec![RankedEntry {
            token: "fox".to_string(),
            count: 2,
        }];

        let mut text = Vec::new();
        write_ranking(&mut text, OutputFormat::Text, Style::Actor, &ranking).unwrap();
        assert_eq!(String::from_utf8(text).unwrap(), "fox  -  2\n");

        let mut json = Vec::new();
        write_ranking(&mut json, OutputFormat::Json, Style::Actor, &ranking).unwrap();
        assert!(String::from_utf8(json).unwrap().starts_with('{'));
    }
}
