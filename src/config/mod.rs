//! Configuration module
//!
//! Handles CLI argument parsing, the optional TOML run file, and validation.
//! Precedence is CLI flag, then run file, then built-in default.

pub mod cli;
pub mod toml;
pub mod validator;

use crate::coordinator::{RunSettings, Style};
use crate::output::OutputFormat;
use crate::stats::{RankPolicy, DEFAULT_TOP};
use crate::text::DEFAULT_STOP_WORDS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Text file to count
    pub input: PathBuf,
    /// Comma-separated stop-word file
    #[serde(default = "default_stop_words")]
    pub stop_words: PathBuf,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub format: OutputFormat,
    /// Number of ranked entries to report
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_stop_words() -> PathBuf {
    PathBuf::from(DEFAULT_STOP_WORDS)
}

fn default_top() -> usize {
    DEFAULT_TOP
}

impl Config {
    /// Configuration with every optional setting at its default
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            stop_words: default_stop_words(),
            style: Style::default(),
            format: OutputFormat::default(),
            top: default_top(),
        }
    }

    /// Settings handed to the coordinators
    ///
    /// The binary always caps the ranking at the number of distinct tokens.
    pub fn settings(&self) -> RunSettings {
        RunSettings {
            stop_words: self.stop_words.clone(),
            top: self.top,
            policy: RankPolicy::Capped,
        }
    }
}
