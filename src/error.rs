/*
 * Error Module
 *
 * Error types for loading configuration and starting the simulation.
 * Frame-level problems (empty population, inconsistent cells) are not errors;
 * the driver reports them as skipped frames or skipped agents instead.
 */

use std::path::PathBuf;

// Errors raised while reading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// Reasons the driver refuses to run for the whole session
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("no simulation configuration was provided")]
    MissingConfiguration,
    #[error("simulation configuration rejected: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}
