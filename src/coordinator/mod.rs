//! Coordinators
//!
//! Two driving-thread choreographies compute the same term frequencies:
//!
//! - [`actor::ActorCoordinator`]: three active objects (ingestion, filtering,
//!   aggregation) wired together by messages
//! - [`dataspace::DataspaceCoordinator`]: a counting pool and a partitioned
//!   merge pool separated by join barriers
//!
//! Both implement [`Coordinator`] and are selected with [`Style`].

pub mod actor;
pub mod dataspace;

use actor::ActorCoordinator;
use dataspace::DataspaceCoordinator;

use crate::error::PipelineError;
use crate::stats::{FrequencyMap, RankPolicy, RankedEntry, DEFAULT_TOP};
use crate::text::DEFAULT_STOP_WORDS;
use crate::Result;
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which coordinator(s) to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Mailbox-based active objects
    #[default]
    Actor,
    /// Shared token space with counting and merge pools
    Dataspace,
    /// Run both and require identical rankings
    Both,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Actor => write!(f, "actor"),
            Style::Dataspace => write!(f, "dataspace"),
            Style::Both => write!(f, "both"),
        }
    }
}

/// Settings shared by both coordinators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub stop_words: PathBuf,
    pub top: usize,
    pub policy: RankPolicy,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            stop_words: PathBuf::from(DEFAULT_STOP_WORDS),
            top: DEFAULT_TOP,
            policy: RankPolicy::Capped,
        }
    }
}

/// Result of one coordinator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub style: Style,
    /// Every counted token, not only the ranked ones
    pub counts: FrequencyMap,
    pub ranking: Vec<RankedEntry>,
}

/// A driving-thread choreography over the shared pipeline
pub trait Coordinator {
    fn style(&self) -> Style;

    /// Count `input` and rank the result
    fn run(&self, input: &Path) -> Result<Outcome>;
}

/// Run the coordinator(s) selected by `style` on `input`
///
/// [`Style::Both`] returns two outcomes (actor first) after checking that
/// their rankings agree.
pub fn run(style: Style, input: &Path, settings: &RunSettings) -> Result<Vec<Outcome>> {
    let coordinators: Vec<Box<dyn Coordinator>> = match style {
        Style::Actor => vec![Box::new(ActorCoordinator::new(settings.clone()))],
        Style::Dataspace => vec![Box::new(DataspaceCoordinator::new(settings.clone()))],
        Style::Both => vec![
            Box::new(ActorCoordinator::new(settings.clone())),
            Box::new(DataspaceCoordinator::new(settings.clone())),
        ],
    };

    let mut outcomes = Vec::with_capacity(coordinators.len());
    for coordinator in &coordinators {
        debug!("running {} coordinator on {}", coordinator.style(), input.display());
        outcomes.push(coordinator.run(input)?);
    }

    if let [first, second] = outcomes.as_slice() {
        check_equivalence(&first.ranking, &second.ranking)?;
    }
    Ok(outcomes)
}

/// Require two rankings to be identical, entry by entry
pub fn check_equivalence(left: &[RankedEntry], right: &[RankedEntry]) -> Result<(), PipelineError> {
    let mismatch = left
        .iter()
        .zip(right)
        .position(|(l, r)| l != r)
        .or_else(|| (left.len() != right.len()).then(|| left.len().min(right.len())));

    match mismatch {
        Some(rank) => Err(PipelineError::Diverged { rank }),
        None => Ok(()),
    }
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
    fn test_equivalence() {
        let left = vec![entry("fox", 2), entry("quick", 2)];
        assert!(check_equivalence(&left, &left.clone()).is_ok());
        assert!(check_equivalence(&[], &[]).is_ok());
    }

    #[test]
    fn test_equivalence_mismatch() {
        let left = vec![entry("fox", 2), entry("quick", 2)];
        let right = vec![entry("fox", 2), entry("quick", 1)];
        assert!(matches!(
            check_equivalence(&left, &right),
            Err(PipelineError::Diverged { rank: 1 })
        ));
    }

    #[test]
    fn test_equivalence_length_mismatch() {
        let left = vec![entry("fox", 2)];
        let right = vec![entry("fox", 2), entry("quick", 1)];
        assert!(matches!(
            check_equivalence(&left, &right),
            Err(PipelineError::Diverged { rank: 1 })
        ));
    }

    #[test]
    fn test_outcome_style_comes_from_coordinator() {
        let settings = RunSettings::default();
        assert_eq!(ActorCoordinator::new(settings.clone()).style(), Style::Actor);
        assert_eq!(DataspaceCoordinator::new(settings).style(), Style::Dataspace);
    }

    #[test]
    fn test_style_display() {
        assert_eq!(Style::Actor.to_string(), "actor");
        assert_eq!(Style::Dataspace.to_string(), "dataspace");
        assert_eq!(Style::default(), Style::Actor);
    }
}
