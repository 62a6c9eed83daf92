//! Environment sources
//!
//! The resolver reads environment variables through [`EnvSource`] so the
//! process environment can be replaced by a fixed map in tests or when
//! resolving settings for a child process.

use std::collections::HashMap;
use std::env;

use log::warn;

/// Read-only view of a set of environment variables
pub trait EnvSource {
    /// Value of `name`, `None` when unset. An empty value counts as set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        let value = env::var_os(name)?;
        match value.into_string() {
            Ok(value) => Some(value),
            Err(raw) => {
                warn!("Environment variable {} is not valid UTF-8, using a lossy conversion", name);
                Some(raw.to_string_lossy().into_owned())
            }
        }
    }
}

/// A fixed set of variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn unset(&mut self, name: &str) {
        self.0.remove(name);
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
