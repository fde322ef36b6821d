//! Actor-style coordinator
//!
//! The driving thread builds the three roles in dependency order, sends the
//! three kick-off messages and then waits for every role to stop:
//!
//! ```text
//! driver ── init(aggregation) ──────────▶ filtering
//! driver ── init(path, filtering) ──────▶ ingestion
//! driver ── run(ingestion) ─────────────▶ aggregation ── send_word_freqs ─▶ ingestion
//! ```
//!
//! The aggregation role hands its ranking back over a report channel and
//! starts the `die` cascade (aggregation → ingestion → filtering). The run is
//! complete once all three threads have been joined.

use super::{Coordinator, Outcome, RunSettings, Style};
use crate::actor::roles::{Aggregation, Filtering, Ingestion, Report};
use crate::actor::{ActorHandle, ActorSystem, Message, Setup};
use crate::error::PipelineError;
use crate::Result;
use crossbeam::channel;
use log::{debug, error};
use std::path::Path;

/// Runs the pipeline as three active objects
#[derive(Debug, Clone, Default)]
pub struct ActorCoordinator {
    settings: RunSettings,
}

impl ActorCoordinator {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }
}

/// Handles of the three roles, in join order
pub struct Pipeline {
    pub aggregation: ActorHandle<Message>,
    pub filtering: ActorHandle<Message>,
    pub ingestion: ActorHandle<Message>,
}

impl Pipeline {
    /// Join every role, logging failures without stopping early
    ///
    /// Once all three have been joined, returns the failure of the role that
    /// brought `system` down, falling back to the first failure seen.
    pub fn join(self, system: &ActorSystem) -> Result<()> {
        let mut failures = Vec::new();
        for handle in [self.aggregation, self.filtering, self.ingestion] {
            let name = handle.name();
            if let Err(err) = handle.join() {
                error!("{} role did not stop cleanly: {:#}", name, err);
                failures.push((name, err));
            }
        }

        let root = system
            .failed_object()
            .and_then(|cause| failures.iter().position(|(name, _)| *name == cause))
            .unwrap_or(0);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.swap_remove(root).1)
        }
    }
}

impl ActorCoordinator {
    /// Spawn and wire the roles, returning once the kick-off messages are sent
    ///
    /// The report channel yields the aggregation role's result.
    pub fn start(
        &self,
        system: &ActorSystem,
        input: &Path,
    ) -> Result<(Pipeline, channel::Receiver<Report>)> {
        let (report_tx, report_rx) = channel::bounded(1);

        let aggregation = system.spawn(Aggregation::new(
            self.settings.top,
            self.settings.policy,
            report_tx,
        ))?;
        let filtering = system.spawn(Filtering::new(self.settings.stop_words.clone()))?;
        let ingestion = system.spawn(Ingestion::new())?;

        let pipeline = Pipeline {
            aggregation,
            filtering,
            ingestion,
        };
        if let Err(err) = kick_off(&pipeline, input) {
            // a role that already failed explains the undeliverable kick-off
            system.cancel();
            return Err(match pipeline.join(system) {
                Err(root) if system.failed_object().is_some() => root,
                _ => err,
            });
        }
        Ok((pipeline, report_rx))
    }
}

fn kick_off(pipeline: &Pipeline, input: &Path) -> Result<()> {
    pipeline.filtering.send(Message::Init(Setup::Filtering {
        aggregator: pipeline.aggregation.actor_ref(),
    }))?;
    pipeline.ingestion.send(Message::Init(Setup::Ingestion {
        path: input.to_path_buf(),
        filter: pipeline.filtering.actor_ref(),
    }))?;
    pipeline.aggregation.send(Message::Run {
        ingestion: pipeline.ingestion.actor_ref(),
    })?;
    Ok(())
}

impl Coordinator for ActorCoordinator {
    fn style(&self) -> Style {
        Style::Actor
    }

    fn run(&self, input: &Path) -> Result<Outcome> {
        let system = ActorSystem::new();
        let (pipeline, report_rx) = self.start(&system, input)?;
        debug!("actor pipeline started for {}", input.display());

        pipeline.join(&system)?;

        let Report { counts, ranking } = report_rx.try_recv().map_err(|_| PipelineError::NoReport)?;
        debug!("actor pipeline stopped: {} distinct tokens", counts.len());
        Ok(Outcome {
            style: self.style(),
            counts,
            ranking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::RankPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn settings(stop_words: &NamedTempFile) -> RunSettings {
        RunSettings {
            stop_words: stop_words.path().to_path_buf(),
            ..RunSettings::default()
        }
    }

    #[test]
    fn test_quick_fox() {
        let input = temp_file("The Quick fox. The QUICK fox jumps!");
        let stop_words = temp_file("the");

        let outcome = ActorCoordinator::new(settings(&stop_words)).run(input.path()).unwrap();
        assert_eq!(outcome.style, Style::Actor);
        assert_eq!(outcome.counts.get("quick"), Some(2));
        assert_eq!(outcome.counts.get("fox"), Some(2));
        assert_eq!(outcome.counts.get("jumps"), Some(1));
        assert_eq!(outcome.counts.get("the"), None);
        assert_eq!(outcome.ranking.len(), 3);
    }

    #[test]
    fn test_all_roles_stop_after_top25() {
        let input = temp_file("one two three two three three");
        let stop_words = temp_file("one");
        let coordinator = ActorCoordinator::new(settings(&stop_words));

        let system = ActorSystem::new();
        let (pipeline, report_rx) = coordinator.start(&system, input.path()).unwrap();
        let report = report_rx.recv().unwrap();
        assert_eq!(report.ranking[0].token, "three");

        let aggregation = pipeline.aggregation.actor_ref();
        let filtering = pipeline.filtering.actor_ref();
        let ingestion = pipeline.ingestion.actor_ref();
        pipeline.join(&system).unwrap();

        assert!(!aggregation.is_running());
        assert!(!filtering.is_running());
        assert!(!ingestion.is_running());
        assert!(!system.is_cancelled());
    }

    #[test]
    fn test_missing_input_stops_every_role() {
        let stop_words = temp_file("the");
        let err = ActorCoordinator::new(settings(&stop_words))
            .run(Path::new("/nonexistent/input.txt"))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read input file"));
    }

    #[test]
    fn test_missing_stop_words_stops_every_role() {
        let input = temp_file("quick fox");
        let settings = RunSettings {
            stop_words: "/nonexistent/stop_words.txt".into(),
            ..RunSettings::default()
        };
        let err = ActorCoordinator::new(settings).run(input.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read stop-word file"));
    }

    #[test]
    fn test_strict_policy_fails_with_few_tokens() {
        let input = temp_file("quick fox");
        let stop_words = temp_file("a,an,the,of");
        let settings = RunSettings {
            policy: RankPolicy::Strict,
            ..settings(&stop_words)
        };

        let err = ActorCoordinator::new(settings).run(input.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InsufficientTokens { requested: 25, available: 2 })
        ));
    }
}
