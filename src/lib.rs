//! termfreq - term frequencies through two coordination styles
//!
//! termfreq counts how often each word occurs in a text file and reports the
//! most frequent ones. The same pipeline (read, normalize, drop stop words,
//! count, rank) runs under either of two concurrency choreographies.
//!
//! # Architecture
//!
//! - **Actor style**: three active objects with private state and a mailbox
//!   each (ingestion → filtering → aggregation), see [`coordinator::actor`]
//! - **Dataspace style**: a counting pool draining a shared token queue,
//!   then a merge pool over disjoint alphabet partitions, see
//!   [`coordinator::dataspace`]
//! - **Shared pieces**: text normalization ([`text`]), frequency maps and
//!   ranking ([`stats`]), CLI/TOML configuration ([`config`]) and output
//!   formatting ([`output`])

pub mod actor;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod output;
pub mod stats;
pub mod text;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{Coordinator, Outcome, RunSettings, Style};
pub use error::PipelineError;
pub use stats::{FrequencyMap, RankPolicy, RankedEntry};

/// Result type used throughout termfreq
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
