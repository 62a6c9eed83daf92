//! Dotted configuration paths
//!
//! A path is `section` or `section.key`. Only the first dot separates the
//! section from the key, so keys may contain dots themselves.

use std::fmt;
use std::str::FromStr;

use crate::config::error::{ConfigError, Result};

/// Address of a section or of a single entry in `conan.conf`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    section: String,
    key: Option<String>,
}

impl ConfigPath {
    /// Path addressing a whole section
    pub fn section(section: impl Into<String>) -> Self {
        Self { section: section.into(), key: None }
    }

    /// Path addressing a single key
    pub fn key(section: impl Into<String>, key: impl Into<String>) -> Self {
        Self { section: section.into(), key: Some(key.into()) }
    }

    /// Parse a dotted path, splitting on the first `.`
    pub fn parse(text: &str) -> Result<Self> {
        let (section, key) = match text.split_once('.') {
            Some((section, key)) => (section, Some(key)),
            None => (text, None),
        };

        if section.is_empty() {
            return Err(ConfigError::InvalidPath(format!("'{}' has an empty section name", text)));
        }
        if key == Some("") {
            return Err(ConfigError::InvalidPath(format!("'{}' has an empty key name", text)));
        }

        let path = Self {
            section: section.to_string(),
            key: key.map(str::to_string),
        };
        path.validate()?;
        Ok(path)
    }

    /// Check that the names can be written to `conan.conf` and read back unchanged.
    ///
    /// Sections may not contain brackets or line breaks. Keys may not contain
    /// `=` or line breaks, may not start with `[`, `#` or `;`, and may not
    /// carry surrounding whitespace.
    pub fn validate(&self) -> Result<()> {
        let section = self.section.as_str();
        if section.is_empty()
            || section.contains(|c: char| matches!(c, '[' | ']' | '\n' | '\r'))
        {
            return Err(ConfigError::InvalidPath(format!("'{}' is not a valid section name", section)));
        }

        let Some(key) = self.key.as_deref() else {
            return Ok(());
        };
        if key.is_empty()
            || key.trim() != key
            || key.starts_with(|c: char| matches!(c, '[' | '#' | ';'))
            || key.contains(|c: char| matches!(c, '=' | '\n' | '\r'))
        {
            return Err(ConfigError::InvalidPath(format!(
                "'{}' is not a valid key name in [{}]",
                key, section
            )));
        }
        Ok(())
    }

    pub fn section_name(&self) -> &str {
        &self.section
    }

    pub fn key_name(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The key, or `InvalidPath` when the path addresses a whole section
    pub fn require_key(&self) -> Result<&str> {
        self.key.as_deref().ok_or_else(|| {
            ConfigError::InvalidPath(format!(
                "You can't set a full section, please specify a section.key=value (got '{}')",
                self.section
            ))
        })
    }
}

impl FromStr for ConfigPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}.{}", self.section, key),
            None => write!(f, "{}", self.section),
        }
    }
}
