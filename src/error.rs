//! Typed pipeline failures
//!
//! Orchestration code returns `anyhow::Result` (see [`crate::Result`]); the
//! variants here name the failure classes callers may want to match on.
//! They survive `anyhow` context wrapping, so `err.downcast_ref::<PipelineError>()`
//! recovers them from a coordinator's error.

use thiserror::Error;

/// Failures raised by the coordinators and their roles/workers
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Strict ranking asked for more entries than there are distinct tokens
    #[error("ranking needs {requested} distinct tokens but only {available} were counted")]
    InsufficientTokens { requested: usize, available: usize },

    /// An active object's thread panicked
    #[error("{role} role panicked")]
    RolePanicked { role: &'static str },

    /// A dataspace worker thread panicked before the barrier
    #[error("{phase} worker {id} panicked")]
    WorkerPanicked { phase: &'static str, id: usize },

    /// A role received a message it neither owns nor can forward
    #[error("{role} role cannot handle '{tag}' message")]
    UnexpectedMessage { role: &'static str, tag: &'static str },

    /// The recipient of a message had already stopped
    #[error("{role} role could not deliver '{tag}' message: recipient stopped")]
    UndeliverableMessage { role: &'static str, tag: &'static str },

    /// The actor pipeline stopped without handing back a ranking
    #[error("actor pipeline stopped without producing a ranking")]
    NoReport,

    /// The two coordinators disagreed on the same input
    #[error("actor and dataspace rankings differ (first mismatch at rank {rank})")]
    Diverged { rank: usize },
}
