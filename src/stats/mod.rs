//! Frequency statistics
//!
//! This module holds the data every coordinator reduces to:
//!
//! - [`FrequencyMap`]: token → positive count
//! - [`RankedEntry`]: one `(token, count)` row of the final report
//! - [`rank`]: top-N selection shared by both coordinators
//!
//! Partial maps published by dataspace workers live in [`aggregator`].
//!
//! # Ordering
//!
//! Rankings are ordered by count descending, then token ascending. The
//! secondary key makes the result independent of hash-map iteration order,
//! so the actor and dataspace coordinators agree on every input.

pub mod aggregator;

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, HashMap};

/// Default number of entries reported
pub const DEFAULT_TOP: usize = 25;

/// Mapping from token to its number of counted occurrences
///
/// Counts are always positive: a key exists only once it has been seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: HashMap<String, u64>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `token`
    pub fn increment(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.to_owned(), 1);
            }
        }
    }

    /// Fold `count` occurrences of `token` in (insert-or-add)
    pub fn add(&mut self, token: &str, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(token.to_owned()).or_insert(0) += count;
    }

    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, u64> {
        self.counts.iter()
    }

    /// Move every entry of `other` into `self`
    ///
    /// Keys present in both maps have their counts added.
    pub fn absorb(&mut self, other: FrequencyMap) {
        for (token, count) in other.counts {
            *self.counts.entry(token).or_insert(0) += count;
        }
    }
}

impl<'a> IntoIterator for &'a FrequencyMap {
    type Item = (&'a String, &'a u64);
    type IntoIter = hash_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl<'a> FromIterator<&'a str> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut map = Self::new();
        for token in iter {
            map.increment(token);
        }
        map
    }
}

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub token: String,
    pub count: u64,
}

/// What [`rank`] does when fewer distinct tokens exist than requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankPolicy {
    /// Return every token that exists, up to the requested number
    #[default]
    Capped,
    /// Fail with [`PipelineError::InsufficientTokens`]
    Strict,
}

/// Select the `top` most frequent tokens of `map`
///
/// Entries are ordered by count descending, ties by token ascending.
pub fn rank(
    map: &FrequencyMap,
    top: usize,
    policy: RankPolicy,
) -> Result<Vec<RankedEntry>, PipelineError> {
    if policy == RankPolicy::Strict && map.len() < top {
        return Err(PipelineError::InsufficientTokens {
            requested: top,
            available: map.len(),
        });
    }

    let mut entries: Vec<(&String, &u64)> = map.iter().collect();
    entries.sort_unstable_by(|(a_token, a_count), (b_token, b_count)| {
        b_count.cmp(a_count).then_with(|| a_token.cmp(b_token))
    });

    Ok(entries
        .into_iter()
        .take(top)
        .map(|(token, &count)| RankedEntry {
            token: token.clone(),
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(token: &str, count: u64) -> RankedEntry {
        RankedEntry {
            token: token.to_string(),
            count,
        }
    }

    #[test]
    fn test_increment() {
        let mut map = FrequencyMap::new();
        map.increment("fox");
        map.increment("fox");
        map.increment("quick");

        assert_eq!(map.get("fox"), Some(2));
        assert_eq!(map.get("quick"), Some(1));
        assert_eq!(map.get("jumps"), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.total(), 3);
    }

    #[test]
    fn test_add_ignores_zero() {
        let mut map = FrequencyMap::new();
        map.add("fox", 0);
        assert!(map.is_empty());

        map.add("fox", 3);
        map.add("fox", 4);
        assert_eq!(map.get("fox"), Some(7));
    }

    #[test]
    fn test_absorb() {
        let mut left: FrequencyMap = ["fox", "fox", "dog"].into_iter().collect();
        let right: FrequencyMap = ["fox", "cat"].into_iter().collect();
        left.absorb(right);

        assert_eq!(left.get("fox"), Some(3));
        assert_eq!(left.get("dog"), Some(1));
        assert_eq!(left.get("cat"), Some(1));
    }

    #[test]
    fn test_rank_orders_by_count_then_token() {
        let map: FrequencyMap = ["quick", "fox", "jumps", "fox", "quick", "lazy"]
            .into_iter()
            .collect();
        let ranked = rank(&map, 10, RankPolicy::Capped).unwrap();

        assert_eq!(
            ranked,
            vec![entry("fox", 2), entry("quick", 2), entry("jumps", 1), entry("lazy", 1)]
        );
    }

    #[test]
    fn test_rank_truncates() {
        let map: FrequencyMap = ["aa", "aa", "aa", "bb", "bb", "cc"].into_iter().collect();
        let ranked = rank(&map, 2, RankPolicy::Strict).unwrap();
        assert_eq!(ranked, vec![entry("aa", 3), entry("bb", 2)]);
    }

    #[test]
    fn test_rank_strict_insufficient() {
        let map: FrequencyMap = ["aa", "bb"].into_iter().collect();
        let err = rank(&map, DEFAULT_TOP, RankPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InsufficientTokens { requested: 25, available: 2 }
        ));
    }

    #[test]
    fn test_rank_capped_insufficient() {
        let map: FrequencyMap = ["aa", "bb"].into_iter().collect();
        let ranked = rank(&map, DEFAULT_TOP, RankPolicy::Capped).unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_rank_empty() {
        let ranked = rank(&FrequencyMap::new(), DEFAULT_TOP, RankPolicy::Capped).unwrap();
        assert!(ranked.is_empty());
    }
}
