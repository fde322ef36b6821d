//! Shared text utilities
//!
//! Both coordinators consume text through the same three pure functions:
//!
//! - [`normalize`]: lowercase, every non-letter becomes a space
//! - [`tokenize`] / [`read_tokens`]: split on whitespace, drop tokens shorter
//!   than [`MIN_TOKEN_LEN`]
//! - [`StopWordSet::load`]: comma-separated stop-word resource
//!
//! Nothing here is concurrent; loading happens before any parallel phase.

use crate::Result;
use anyhow::Context;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Shortest token that is ever counted
pub const MIN_TOKEN_LEN: usize = 2;

/// Well-known relative name of the stop-word resource
pub const DEFAULT_STOP_WORDS: &str = "stop_words.txt";

fn non_letters() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[^a-z]+").expect("static pattern is valid"))
}

/// Lowercase `raw` and replace every run of non-letters with a single space
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    non_letters().replace_all(&lowered, " ").into_owned()
}

/// Whether a token is long enough to be counted
#[inline]
pub fn is_qualifying(token: &str) -> bool {
    token.len() >= MIN_TOKEN_LEN
}

/// Normalize `raw` and return its qualifying tokens in text order
pub fn tokenize(raw: &str) -> Vec<String> {
    normalize(raw)
        .split_whitespace()
        .filter(|token| is_qualifying(token))
        .map(str::to_owned)
        .collect()
}

/// Read a file and tokenize its contents
///
/// Invalid UTF-8 is replaced rather than rejected: any replacement
/// character is a non-letter and becomes a separator anyway.
pub fn read_tokens(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let tokens = tokenize(&String::from_utf8_lossy(&bytes));
    log::debug!("{}: {} qualifying tokens", path.display(), tokens.len());
    Ok(tokens)
}

/// Read-only set of words excluded from counting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    /// Load a comma-separated stop-word file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stop-word file: {}", path.display()))?;
        let set = Self::parse(&contents);
        log::debug!("{}: {} stop words", path.display(), set.len());
        Ok(set)
    }

    /// Parse comma-separated stop words, trimming whitespace around entries
    pub fn parse(contents: &str) -> Self {
        contents
            .split(',')
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopWordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}
