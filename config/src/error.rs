//! Error types for analysis configuration handling.
//!
//! Provides a unified error type covering all failure modes: I/O,
//! serialization, malformed configuration and analysis-tree errors.

use analysis_schema_core::AnalysisError;
use thiserror::Error;

/// Errors that can occur while loading or applying a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration is well-formed but unusable (e.g. empty version).
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Applying the configuration to an analysis tree failed.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
