//! Error types for repository configuration.

use thiserror::Error;

/// Errors returned while parsing or loading repository configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A project picker entry is not in `workspace/project` form.
    #[error("invalid project selection '{0}', expected workspace/project")]
    InvalidSelection(String),

    /// Persisted configuration could not be encoded or decoded.
    #[error("invalid persisted configuration: {0}")]
    Serialization(String),
}
