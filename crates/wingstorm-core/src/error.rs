//! Error types for the edges of the simulation (settings loading).
//!
//! Nothing inside a simulation tick returns an error; anomalies there are
//! clamped or treated as settled.

use thiserror::Error;

/// Errors raised while loading or validating `GameSettings`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for the settings schema.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range or a range is inverted.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
