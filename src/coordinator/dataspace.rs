//! Dataspace-style coordinator
//!
//! ```text
//! load tokens + stop words (sequential)
//!        │
//!        ▼
//! TokenSpace ──▶ 5 counter workers ──▶ PartialSpace      (join barrier)
//!                                          │ seal
//!                                          ▼
//!          a-e │ f-j │ k-o │ p-t │ u-z merge workers    (join barrier)
//!                                          │
//!                                          ▼
//!                                  rank (single thread)
//! ```
//!
//! The two phases share no mutable state: phase one only publishes, phase
//! two only reads the sealed partial maps and owns a disjoint key range.

use super::{Coordinator, Outcome, RunSettings, Style};
use crate::stats::rank;
use crate::text::{self, StopWordSet};
use crate::worker::partition::{validate_partitions, ALPHABET_PARTITIONS};
use crate::worker::{run_counting_phase, run_merge_phase, TokenSpace};
use crate::Result;
use log::debug;
use std::path::Path;
use std::sync::Arc;

/// Runs the pipeline as two barrier-separated worker pools
#[derive(Debug, Clone, Default)]
pub struct DataspaceCoordinator {
    settings: RunSettings,
}

impl DataspaceCoordinator {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }
}

impl Coordinator for DataspaceCoordinator {
    fn style(&self) -> Style {
        Style::Dataspace
    }

    fn run(&self, input: &Path) -> Result<Outcome> {
        validate_partitions(&ALPHABET_PARTITIONS)?;

        let tokens = TokenSpace::from_tokens(text::read_tokens(input)?);
        let stop_words = StopWordSet::load(&self.settings.stop_words)?;
        let total = tokens.len();

        let partials = run_counting_phase(Arc::new(tokens), Arc::new(stop_words))?;
        let counts = run_merge_phase(partials.seal(), &ALPHABET_PARTITIONS)?;
        debug!(
            "dataspace: {} tokens, {} counted, {} discarded",
            total,
            counts.total(),
            total as u64 - counts.total()
        );

        let ranking = rank(&counts, self.settings.top, self.settings.policy)?;
        Ok(Outcome {
            style: self.style(),
            counts,
            ranking,
        })
    }
}
