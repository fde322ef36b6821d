//! termfreq CLI entry point

use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;
use termfreq::config::{cli::Cli, toml::load_config, validator::validate_config};
use termfreq::{coordinator, output};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let config = load_config(&cli)?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("configuration: {:?}", config);

    let start = Instant::now();
    let outcomes = coordinator::run(config.style, &config.input, &config.settings())?;
    for outcome in &outcomes {
        info!(
            "{} style: {} distinct tokens, {} counted",
            outcome.style,
            outcome.counts.len(),
            outcome.counts.total()
        );
    }
    debug!("run finished in {:.3}s", start.elapsed().as_secs_f64());

    // with both styles the rankings were already checked to be identical
    let ranking = match outcomes.first() {
        Some(outcome) => &outcome.ranking,
        None => anyhow::bail!("no coordinator ran"),
    };
    output::print_ranking(config.format, config.style, ranking)
}

/// Log to stderr at `warn` (or `debug` with `--debug`); `RUST_LOG` wins
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}
