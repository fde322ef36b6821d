//! Key-range partitions for the merge phase
//!
//! Every merge worker owns one [`KeyRange`] over the first letter of a
//! token. As long as the ranges are pairwise disjoint, no two workers ever
//! fold the same key, which is what lets them write without locks.

use crate::Result;
use std::fmt;

/// Inclusive range of first letters, e.g. `a..=e`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    first: u8,
    last: u8,
}

/// The five fixed merge partitions
pub const ALPHABET_PARTITIONS: [KeyRange; 5] = [
    KeyRange::new(b'a', b'e'),
    KeyRange::new(b'f', b'j'),
    KeyRange::new(b'k', b'o'),
    KeyRange::new(b'p', b't'),
    KeyRange::new(b'u', b'z'),
];

impl KeyRange {
    /// Range of first letters `first..=last`
    pub const fn new(first: u8, last: u8) -> Self {
        Self { first, last }
    }

    pub fn first(&self) -> char {
        self.first as char
    }

    pub fn last(&self) -> char {
        self.last as char
    }

    /// Whether `token` starts with a letter in this range
    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        token
            .as_bytes()
            .first()
            .map_or(false, |&b| self.first <= b && b <= self.last)
    }

    pub fn overlaps(&self, other: &KeyRange) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first(), self.last())
    }
}

/// Check that `ranges` cover exactly `a`-`z`, in order, without gaps or overlaps
pub fn validate_partitions(ranges: &[KeyRange]) -> Result<()> {
    let mut next = b'a';
    let mut previous: Option<&KeyRange> = None;
    for range in ranges {
        if range.first > range.last {
            anyhow::bail!("partition {} is empty", range);
        }
        if let Some(previous) = previous.filter(|previous| previous.overlaps(range)) {
            anyhow::bail!("partition {} overlaps {}", range, previous);
        }
        if range.first != next {
            anyhow::bail!(
                "partition {} should start at '{}'",
                range,
                next as char
            );
        }
        next = range.last + 1;
        previous = Some(range);
    }
    if next != b'z' + 1 {
        anyhow::bail!("partitions end at '{}', not 'z'", (next - 1) as char);
    }
    Ok(())
}
