//! Precedence resolution
//!
//! Every setting is resolved in the same order:
//!
//! 1. Environment variable (an empty value still counts as set)
//! 2. Value stored in `conan.conf`, unquoted
//! 3. Compiled-in default

use std::collections::BTreeMap;

use log::debug;

use crate::config::defaults::{find_setting, DefaultValue, SETTINGS};
use crate::config::path::ConfigPath;
use crate::config::source::EnvSource;
use crate::config::store::ConfigStore;
use crate::config::types::ValueSource;

/// Strip one layer of matching single or double quotes
pub fn unquote(text: &str) -> &str {
    let text = text.trim();
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last))
            if bytes.len() > 1 && first == last && (first == b'"' || first == b'\'') =>
        {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

/// Resolves settings against an environment and a store
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a ConfigStore,
    env: &'a dyn EnvSource,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a ConfigStore, env: &'a dyn EnvSource) -> Self {
        Self { store, env }
    }

    /// Effective value of a setting, or `default` when neither source has it
    pub fn resolve(&self, env_var: &str, path: &ConfigPath, default: Option<&str>) -> Option<String> {
        self.resolve_with_source(env_var, path, default)
            .map(|(value, _)| value)
    }

    /// Like [`Resolver::resolve`], also reporting where the value came from
    pub fn resolve_with_source(
        &self,
        env_var: &str,
        path: &ConfigPath,
        default: Option<&str>,
    ) -> Option<(String, ValueSource)> {
        if let Some(value) = self.env.var(env_var) {
            debug!("{} taken from environment variable {}", path, env_var);
            return Some((value, ValueSource::Environment));
        }

        match self.store.get(path) {
            Ok(value) => Some((unquote(&value).to_string(), ValueSource::File)),
            Err(e) => {
                debug!("{} not stored ({}), using default", path, e);
                default.map(|value| (value.to_string(), ValueSource::Default))
            }
        }
    }

    /// Resolve one row of the precedence table by its environment variable.
    ///
    /// Returns `None` for unknown variables and for unset settings without a default.
    pub fn setting(&self, env_var: &str) -> Option<(String, ValueSource)> {
        let (group, setting) = find_setting(env_var)?;
        self.resolve_table_entry(&group.path(setting), setting.env_var, setting.default)
    }

    /// Effective value of every table entry that has one, keyed by variable name.
    ///
    /// Suitable for exporting the configuration into a child process environment.
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        for group in SETTINGS {
            for setting in group.settings {
                let path = group.path(setting);
                if let Some((value, _)) = self.resolve_table_entry(&path, setting.env_var, setting.default) {
                    vars.insert(setting.env_var.to_string(), value);
                }
            }
        }
        vars
    }

    fn resolve_table_entry(
        &self,
        path: &ConfigPath,
        env_var: &str,
        default: DefaultValue,
    ) -> Option<(String, ValueSource)> {
        let default = default.render();
        self.resolve_with_source(env_var, path, default.as_deref())
    }
}
