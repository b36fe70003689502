//! Configuration error taxonomy.

use thiserror::Error;

/// Configuration load failures.
///
/// Every variant is fatal at the load boundary, whether that is startup or
/// a per-cycle reload. The variant identifies the sub-kind for operators.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file missing or unreadable.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed YAML or missing required field.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Structurally valid but semantically invalid configuration.
    #[error("config validation error: {0}")]
    Validation(String),
}
