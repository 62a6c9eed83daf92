//! Configuration errors
//!
//! This module defines error types for the configuration module.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Malformed stored text or duration string.
    ///
    /// `line` is 1-based for file content and 0 for standalone values.
    Format { line: usize, message: String },

    /// The addressed section does not exist
    MissingSection(String),

    /// The addressed key does not exist within an existing section
    MissingKey { section: String, key: String },

    /// A whole section was addressed where a key was required, or the path is empty
    InvalidPath(String),

    /// A value is present but fails type coercion
    InvalidConfig(String),

    /// Backing file not found
    NotFound(PathBuf),

    /// Error reading or writing the backing file
    Io(PathBuf, String),
}

impl ConfigError {
    /// Whether this error only means "nothing stored here".
    ///
    /// The resolver substitutes defaults for these instead of reporting them.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::MissingSection(_) | ConfigError::MissingKey { .. })
    }

    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        ConfigError::Format { line, message: message.into() }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Format { line: 0, message } =>
                write!(f, "Format error: {}", message),

            ConfigError::Format { line, message } =>
                write!(f, "Format error at line {}: {}", line, message),

            ConfigError::MissingSection(section) =>
                write!(f, "'{}' is not a section of conan.conf", section),

            ConfigError::MissingKey { section, key } =>
                write!(f, "'{}' doesn't exist in [{}]", key, section),

            ConfigError::InvalidPath(msg) =>
                write!(f, "Invalid configuration path: {}", msg),

            ConfigError::InvalidConfig(msg) =>
                write!(f, "Invalid configuration: {}", msg),

            ConfigError::NotFound(path) =>
                write!(f, "Configuration file not found: {}", path.display()),

            ConfigError::Io(path, err) =>
                write!(f, "Error accessing configuration file {}: {}", path.display(), err),
        }
    }
}

impl Error for ConfigError {}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_errors_are_recoverable() {
        assert!(ConfigError::MissingSection("log".to_string()).is_missing());
        assert!(ConfigError::MissingKey {
            section: "log".to_string(),
            key: "level".to_string(),
        }
        .is_missing());
        assert!(!ConfigError::InvalidConfig("bad".to_string()).is_missing());
        assert!(!ConfigError::format(3, "bad line").is_missing());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingKey {
            section: "general".to_string(),
            key: "cpu_count".to_string(),
        };
        assert_eq!(err.to_string(), "'cpu_count' doesn't exist in [general]");

        let err = ConfigError::format(7, "key outside of any section");
        assert_eq!(err.to_string(), "Format error at line 7: key outside of any section");

        let err = ConfigError::format(0, "bad interval");
        assert_eq!(err.to_string(), "Format error: bad interval");
    }
}
