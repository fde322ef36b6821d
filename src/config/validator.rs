//! Configuration validation

use super::Config;
use anyhow::Result;
use std::path::Path;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.top == 0 {
        anyhow::bail!("top must be at least 1");
    }

    validate_file("input file", &config.input)?;
    validate_file("stop-word file", &config.stop_words)?;

    Ok(())
}

fn validate_file(what: &str, path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("{} does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        anyhow::bail!("{} is not a regular file: {}", what, path.display());
    }
    Ok(())
}
