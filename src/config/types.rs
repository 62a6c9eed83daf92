//! Configuration types
//!
//! Value types shared by the resolver and the typed accessors.

use std::fmt;

use log::LevelFilter;
use serde::Serialize;

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Compiled-in default
    Default,
    /// From `conan.conf`
    File,
    /// From environment variable
    Environment,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Default => write!(f, "default"),
            ValueSource::File => write!(f, "file"),
            ValueSource::Environment => write!(f, "environment"),
        }
    }
}

/// Numeric logging level of the package tool.
///
/// Higher is quieter. Any integer is accepted; the named levels are
/// associated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LogLevel(pub i64);

impl LogLevel {
    pub const CRITICAL: LogLevel = LogLevel(50);
    pub const ERROR: LogLevel = LogLevel(40);
    pub const WARNING: LogLevel = LogLevel(30);
    pub const INFO: LogLevel = LogLevel(20);
    pub const DEBUG: LogLevel = LogLevel(10);
    pub const NOTSET: LogLevel = LogLevel(0);

    /// Look up a level name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "critical" => Some(Self::CRITICAL),
            "error" => Some(Self::ERROR),
            "warning" | "warn" => Some(Self::WARNING),
            "info" => Some(Self::INFO),
            "debug" => Some(Self::DEBUG),
            "notset" => Some(Self::NOTSET),
            _ => None,
        }
    }

    /// Parse a level name or an integer level
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_name(text).or_else(|| text.trim().parse().ok().map(LogLevel))
    }

    /// Nearest filter for the `log` facade.
    ///
    /// `log` has no critical level, so CRITICAL and ERROR both map to `Error`.
    pub fn to_level_filter(self) -> LevelFilter {
        match self.0 {
            l if l > Self::WARNING.0 => LevelFilter::Error,
            l if l > Self::INFO.0 => LevelFilter::Warn,
            l if l > Self::DEBUG.0 => LevelFilter::Info,
            l if l > Self::NOTSET.0 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::CRITICAL
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::CRITICAL => "CRITICAL",
            Self::ERROR => "ERROR",
            Self::WARNING => "WARNING",
            Self::INFO => "INFO",
            Self::DEBUG => "DEBUG",
            Self::NOTSET => "NOTSET",
            LogLevel(level) => return write!(f, "Level {}", level),
        };
        write!(f, "{}", name)
    }
}
