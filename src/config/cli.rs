//! CLI argument parsing using clap

use crate::coordinator::Style;
use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// termfreq - term frequencies through actors or a dataspace
#[derive(Parser, Debug)]
#[command(name = "termfreq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Text file to count
    #[arg(value_name = "PATH")]
    pub input: PathBuf,

    /// Coordination style: actor, dataspace, or both (cross-checked)
    #[arg(long, value_enum)]
    pub style: Option<Style>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Number of entries to report [default: 25]
    #[arg(long)]
    pub top: Option<usize>,

    /// Comma-separated stop-word file [default: stop_words.txt]
    #[arg(long, value_name = "PATH")]
    pub stop_words: Option<PathBuf>,

    /// TOML run file (CLI flags take precedence)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_path_only() {
        let cli = Cli::try_parse_from(["termfreq", "book.txt"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("book.txt"));
        assert!(cli.style.is_none());
        assert!(cli.top.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        assert!(Cli::try_parse_from(["termfreq"]).is_err());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "termfreq",
            "book.txt",
            "--style",
            "both",
            "--format",
            "json",
            "--top",
            "10",
            "--stop-words",
            "words.txt",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.style, Some(Style::Both));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.top, Some(10));
        assert_eq!(cli.stop_words, Some(PathBuf::from("words.txt")));
        assert!(cli.debug);
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(Cli::try_parse_from(["termfreq", "book.txt", "--style", "threads"]).is_err());
    }
}
