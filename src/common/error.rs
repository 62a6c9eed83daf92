//! Error handling module
//!
//! This module defines the crate-level error type used by the command line
//! tool. File system failures arrive as `ConfigError::Io`.

use thiserror::Error;

use crate::config::ConfigError;

/// conan-conf error type
#[derive(Error, Debug)]
pub enum ConfError {
    /// Configuration error
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Command line usage error
    #[error("Usage error: {0}")]
    Usage(String),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `ConfError`.
pub type Result<T> = std::result::Result<T, ConfError>;
