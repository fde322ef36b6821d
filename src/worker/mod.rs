//! Dataspace workers
//!
//! The dataspace pipeline runs two fixed pools back to back, each behind a
//! join barrier:
//!
//! - **Counting** ([`CounterWorker`], [`COUNTER_WORKERS`] threads): claim
//!   tokens from the shared [`TokenSpace`] until it is empty, count the
//!   non-stop words privately, then publish the private map to the
//!   [`PartialSpace`].
//! - **Merging** ([`MergeWorker`], one thread per [`KeyRange`]): scan every
//!   sealed partial map and fold only the keys in the worker's own range.
//!
//! Workers never reference each other; everything they share is passed in
//! explicitly as an `Arc` handle or a read-only view.
//!
//! # Example
//!
//! ```
//! use termfreq::text::StopWordSet;
//! use termfreq::worker::{run_counting_phase, run_merge_phase, TokenSpace};
//! use termfreq::worker::partition::ALPHABET_PARTITIONS;
//! use std::sync::Arc;
//!
//! let tokens = TokenSpace::from_tokens(["the", "quick", "fox", "the", "fox"]);
//! let stop_words: StopWordSet = ["the"].into_iter().collect();
//!
//! let partials = run_counting_phase(Arc::new(tokens), Arc::new(stop_words))?;
//! let counts = run_merge_phase(partials.seal(), &ALPHABET_PARTITIONS)?;
//!
//! assert_eq!(counts.get("fox"), Some(2));
//! assert_eq!(counts.get("the"), None);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod partition;

use crate::error::PipelineError;
use crate::stats::aggregator::{PartialSpace, SealedPartials};
use crate::stats::FrequencyMap;
use crate::text::{self, StopWordSet};
use crate::Result;
use anyhow::Context;
use crossbeam::queue::SegQueue;
use log::{debug, error, trace};
use partition::KeyRange;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Size of the counting pool
pub const COUNTER_WORKERS: usize = 5;

/// Shared FIFO of tokens waiting to be counted
///
/// `claim` is an atomic dequeue: every token goes to exactly one worker.
#[derive(Debug, Default)]
pub struct TokenSpace {
    tokens: SegQueue<String>,
}

impl TokenSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let space = Self::new();
        for token in tokens {
            space.offer(token.into());
        }
        space
    }

    pub fn offer(&self, token: String) {
        self.tokens.push(token);
    }

    /// Take the next token, or `None` once the space is drained
    pub fn claim(&self) -> Option<String> {
        self.tokens.pop()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Phase-one worker: drains the token space into a private map
pub struct CounterWorker {
    id: usize,
    tokens: Arc<TokenSpace>,
    stop_words: Arc<StopWordSet>,
    partials: Arc<PartialSpace>,
}

impl CounterWorker {
    pub fn new(
        id: usize,
        tokens: Arc<TokenSpace>,
        stop_words: Arc<StopWordSet>,
        partials: Arc<PartialSpace>,
    ) -> Self {
        Self {
            id,
            tokens,
            stop_words,
            partials,
        }
    }

    /// Count until the token space is empty, then publish
    ///
    /// Returns the number of tokens this worker claimed.
    pub fn run(self) -> usize {
        let mut counts = FrequencyMap::new();
        let mut claimed = 0;

        while let Some(token) = self.tokens.claim() {
            claimed += 1;
            if text::is_qualifying(&token) && !self.stop_words.contains(&token) {
                counts.increment(&token);
            }
        }

        trace!(
            "counter {}: claimed {} tokens, {} distinct kept",
            self.id,
            claimed,
            counts.len()
        );
        self.partials.publish(counts);
        claimed
    }
}

/// Phase-two worker: folds one key range of every partial map
pub struct MergeWorker {
    id: usize,
    range: KeyRange,
    partials: SealedPartials,
}

impl MergeWorker {
    pub fn new(id: usize, range: KeyRange, partials: SealedPartials) -> Self {
        Self { id, range, partials }
    }

    /// Scan all partial maps and return the merged counts for this range
    ///
    /// Each worker rescans every partial map; only the fold is partitioned.
    pub fn run(self) -> FrequencyMap {
        let mut merged = FrequencyMap::new();

        for partial in self.partials.iter() {
            for (token, &count) in partial {
                if self.range.contains(token) {
                    merged.add(token, count);
                }
            }
        }

        trace!(
            "merger {} ({}): {} distinct tokens",
            self.id,
            self.range,
            merged.len()
        );
        merged
    }
}

/// Join every handle, logging failures without stopping early
///
/// Returns the results in spawn order, or the first failure once all
/// threads have been joined.
fn join_all<T>(phase: &'static str, handles: Vec<JoinHandle<T>>) -> Result<Vec<T>> {
    let mut results = Vec::with_capacity(handles.len());
    let mut first_error = None;

    for (id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(result) => results.push(result),
            Err(_) => {
                error!("{} worker {} panicked", phase, id);
                first_error.get_or_insert(PipelineError::WorkerPanicked { phase, id });
            }
        }
    }

    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(results),
    }
}

/// Run the counting pool to completion
///
/// Returns the partial space once every worker has published, ready to be
/// sealed for the merge phase.
pub fn run_counting_phase(
    tokens: Arc<TokenSpace>,
    stop_words: Arc<StopWordSet>,
) -> Result<PartialSpace> {
    let partials = Arc::new(PartialSpace::new());
    let mut handles = Vec::with_capacity(COUNTER_WORKERS);

    for id in 0..COUNTER_WORKERS {
        let worker = CounterWorker::new(
            id,
            Arc::clone(&tokens),
            Arc::clone(&stop_words),
            Arc::clone(&partials),
        );
        let handle = thread::Builder::new()
            .name(format!("termfreq-counter-{}", id))
            .spawn(move || worker.run())
            .with_context(|| format!("Failed to spawn counter worker {}", id))?;
        handles.push(handle);
    }

    let claimed = join_all("counter", handles)?;
    debug!(
        "counting barrier passed: {} tokens claimed across {} workers",
        claimed.iter().sum::<usize>(),
        claimed.len()
    );

    Arc::try_unwrap(partials)
        .map_err(|_| anyhow::anyhow!("partial space still shared after the counting barrier"))
}

/// Run one merge worker per range and combine their disjoint results
pub fn run_merge_phase(partials: SealedPartials, ranges: &[KeyRange]) -> Result<FrequencyMap> {
    let mut handles = Vec::with_capacity(ranges.len());

    for (id, &range) in ranges.iter().enumerate() {
        let worker = MergeWorker::new(id, range, partials.clone());
        let handle = thread::Builder::new()
            .name(format!("termfreq-merger-{}", range))
            .spawn(move || worker.run())
            .with_context(|| format!("Failed to spawn merge worker {}", range))?;
        handles.push(handle);
    }

    let shards = join_all("merge", handles)?;
    let published = partials.total();

    // ranges are disjoint, so absorbing a shard never adds to an existing key
    let mut merged = FrequencyMap::new();
    for shard in shards {
        merged.absorb(shard);
    }
    if merged.total() != published {
        anyhow::bail!(
            "merge partitions folded {} of {} counts; some tokens fall outside every range",
            merged.total(),
            published
        );
    }
    debug!(
        "merge barrier passed: {} partial maps folded into {} distinct tokens",
        partials.len(),
        merged.len()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::partition::{KeyRange, ALPHABET_PARTITIONS};
    use super::*;

    fn stop_words(words: &[&str]) -> Arc<StopWordSet> {
        Arc::new(words.iter().copied().collect())
    }

    #[test]
    fn test_token_space_claims_each_token_once() {
        let space = Arc::new(TokenSpace::from_tokens((0..10_000).map(|i| format!("t{}", i))));
        assert_eq!(space.len(), 10_000);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let space = Arc::clone(&space);
                thread::spawn(move || {
                    let mut mine = Vec::new();
                    while let Some(token) = space.claim() {
                        mine.push(token);
                    }
                    mine
                })
            })
            .collect();

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 10_000);
        assert!(space.is_empty());
    }

    #[test]
    fn test_counter_worker_skips_stop_words_and_short_tokens() {
        let tokens = Arc::new(TokenSpace::from_tokens(["the", "fox", "a", "fox", "of"]));
        let partials = Arc::new(PartialSpace::new());
        let worker =
            CounterWorker::new(0, tokens, stop_words(&["the", "of"]), Arc::clone(&partials));

        assert_eq!(worker.run(), 5);

        let sealed = Arc::try_unwrap(partials).unwrap().seal();
        assert_eq!(sealed.len(), 1);
        let map = sealed.iter().next().unwrap();
        assert_eq!(map.get("fox"), Some(2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_merge_worker_folds_only_its_range() {
        let space = PartialSpace::new();
        space.publish(["apple", "fox", "zebra"].into_iter().collect());
        space.publish(["fox", "fig", "apple"].into_iter().collect());
        let sealed = space.seal();

        let merged = MergeWorker::new(1, KeyRange::new(b'f', b'j'), sealed).run();
        assert_eq!(merged.get("fox"), Some(2));
        assert_eq!(merged.get("fig"), Some(1));
        assert_eq!(merged.get("apple"), None);
        assert_eq!(merged.get("zebra"), None);
    }

    #[test]
    fn test_counting_phase_publishes_one_map_per_worker() {
        let tokens = Arc::new(TokenSpace::from_tokens(["quick", "fox"]));
        let partials = run_counting_phase(tokens, stop_words(&[])).unwrap();

        // idle workers still publish their (empty) map
        assert_eq!(partials.len(), COUNTER_WORKERS);
        assert_eq!(partials.seal().total(), 2);
    }

    #[test]
    fn test_phases_end_to_end() {
        let words = ["the", "quick", "fox", "the", "quick", "fox", "jumps"];
        let tokens = Arc::new(TokenSpace::from_tokens(words.iter().copied().cycle().take(7_000)));
        let partials = run_counting_phase(tokens, stop_words(&["the"])).unwrap();
        let merged = run_merge_phase(partials.seal(), &ALPHABET_PARTITIONS).unwrap();

        assert_eq!(merged.get("quick"), Some(2_000));
        assert_eq!(merged.get("fox"), Some(2_000));
        assert_eq!(merged.get("jumps"), Some(1_000));
        assert_eq!(merged.get("the"), None);
        assert_eq!(merged.total(), 5_000);
    }

    #[test]
    fn test_merge_phase_rejects_uncovered_tokens() {
        let space = PartialSpace::new();
        space.publish(["fox", "apple"].into_iter().collect());
        let err = run_merge_phase(space.seal(), &[KeyRange::new(b'a', b'e')]).unwrap_err();
        assert!(err.to_string().contains("folded 1 of 2 counts"));
    }

    #[test]
    fn test_merge_phase_with_nothing_published() {
        let merged = run_merge_phase(PartialSpace::new().seal(), &ALPHABET_PARTITIONS).unwrap();
        assert!(merged.is_empty());
    }
}
