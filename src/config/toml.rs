//! TOML run file parsing
//!
//! A run file may set any option except the input path:
//!
//! ```toml
//! style = "both"
//! format = "json"
//! top = 10
//! stop_words = "data/stop_words.txt"
//! ```

use super::cli::Cli;
use super::Config;
use crate::coordinator::Style;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Options read from a run file; unset fields fall through to defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    pub style: Option<Style>,
    pub format: Option<OutputFormat>,
    pub top: Option<usize>,
    pub stop_words: Option<PathBuf>,
}

/// Parse a TOML run file
pub fn parse_toml_file(path: &Path) -> Result<RunFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse a TOML run file from a string
pub fn parse_toml_string(contents: &str) -> Result<RunFile> {
    let run_file: RunFile = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(run_file)
}

/// Merge CLI arguments with a run file (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, run_file: RunFile) -> Config {
    let mut config = Config::new(cli.input.clone());

    if let Some(style) = cli.style.or(run_file.style) {
        config.style = style;
    }
    if let Some(format) = cli.format.or(run_file.format) {
        config.format = format;
    }
    if let Some(top) = cli.top.or(run_file.top) {
        config.top = top;
    }
    if let Some(stop_words) = cli.stop_words.clone().or(run_file.stop_words) {
        config.stop_words = stop_words;
    }

    config
}

/// Build the final configuration from the CLI and its optional run file
pub fn load_config(cli: &Cli) -> Result<Config> {
    let run_file = match &cli.config {
        Some(path) => parse_toml_file(path)?,
        None => RunFile::default(),
    };
    Ok(merge_cli_with_config(cli, run_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_run_file() {
        let run_file = parse_toml_string(
            r#"
            style = "dataspace"
            format = "json"
            top = 5
            stop_words = "words.txt"
            "#,
        )
        .unwrap();

        assert_eq!(run_file.style, Some(Style::Dataspace));
        assert_eq!(run_file.format, Some(OutputFormat::Json));
        assert_eq!(run_file.top, Some(5));
        assert_eq!(run_file.stop_words, Some(PathBuf::from("words.txt")));
    }

    #[test]
    fn test_parse_empty_run_file() {
        assert_eq!(parse_toml_string("").unwrap(), RunFile::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_toml_string("workers = 8").is_err());
        assert!(parse_toml_string("style = \"threads\"").is_err());
    }

    #[test]
    fn test_cli_overrides_run_file() {
        let cli = Cli::try_parse_from(["termfreq", "book.txt", "--top", "3"]).unwrap();
        let run_file = RunFile {
            style: Some(Style::Both),
            top: Some(7),
            ..RunFile::default()
        };

        let config = merge_cli_with_config(&cli, run_file);
        assert_eq!(config.input, PathBuf::from("book.txt"));
        assert_eq!(config.style, Style::Both);
        assert_eq!(config.top, 3);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.stop_words, PathBuf::from("stop_words.txt"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "format = \"json\"").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["termfreq", "book.txt", "--config", path.as_str()]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_config_missing_file() {
        let cli =
            Cli::try_parse_from(["termfreq", "book.txt", "--config", "/nonexistent/run.toml"])
                .unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
