//! Error types for SQLWise
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for SQLWise operations
///
/// This enum encompasses all possible errors that can occur while loading
/// configuration, talking to a generation provider, parsing model replies,
/// and persisting query history.
#[derive(Error, Debug)]
pub enum SqlwiseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (construction, credentials, endpoint shape)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Unified generation failure
    ///
    /// Transport failures and malformed model replies both collapse into
    /// this variant; the caller cannot and should not distinguish them.
    #[error("Generation error: {0}")]
    Generation(String),

    /// History persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Schema id not present in the catalog
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// Dialect name outside the supported set
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for SQLWise operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
