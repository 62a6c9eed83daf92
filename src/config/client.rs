//! Typed client settings
//!
//! [`ClientConfig`] layers named, typed properties over the precedence
//! resolver. Missing values never surface as errors: every accessor has a
//! default. Values that are present but malformed are handled per accessor,
//! see the individual methods.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use once_cell::unsync::OnceCell;
use serde::Serialize;

use crate::config::defaults::{
    ENV_CACERT_PATH, ENV_HOOKS, ENV_LOGGING_FILE, ENV_LOGGING_LEVEL, ENV_LOG_RUN_TO_FILE,
    ENV_LOG_RUN_TO_OUTPUT, ENV_NON_INTERACTIVE, ENV_PRINT_RUN_COMMANDS,
};
use crate::config::duration::parse_interval;
use crate::config::error::{ConfigError, Result};
use crate::config::file::ConfigFile;
use crate::config::path::ConfigPath;
use crate::config::proxy::ProxyMap;
use crate::config::resolver::Resolver;
use crate::config::source::{EnvSource, ProcessEnv};
use crate::config::types::LogLevel;

const PROXIES_SECTION: &str = "proxies";
const HOOKS_SECTION: &str = "hooks";

/// Snapshot of every typed setting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub logging_level: LogLevel,
    pub logging_file: Option<PathBuf>,
    pub log_run_to_output: bool,
    pub generate_run_log_file: bool,
    pub print_commands_to_output: bool,
    pub non_interactive: bool,
    pub parallel_download: Option<u32>,
    pub config_install_interval: Option<Duration>,
    pub proxies: Option<ProxyMap>,
    pub hooks: Vec<String>,
    pub cacert_path: Option<PathBuf>,
    pub required_version: Option<String>,
}

/// Client configuration: `conan.conf` plus environment overrides
pub struct ClientConfig {
    file: ConfigFile,
    env: Box<dyn EnvSource>,
    non_interactive: OnceCell<bool>,
}

impl ClientConfig {
    pub fn new(file: ConfigFile, env: Box<dyn EnvSource>) -> Self {
        Self {
            file,
            env,
            non_interactive: OnceCell::new(),
        }
    }

    /// Open `path` on the local file system with the process environment
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(ConfigFile::open(path)?, Box::new(ProcessEnv)))
    }

    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut ConfigFile {
        &mut self.file
    }

    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.file.store(), self.env.as_ref())
    }

    /// See [`Resolver::env_vars`]
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        self.resolver().env_vars()
    }

    /// Level name or integer; CRITICAL when unset or unparseable
    pub fn logging_level(&self) -> LogLevel {
        let Some(level) = self.resolve(ENV_LOGGING_LEVEL, "log", "level") else {
            return LogLevel::CRITICAL;
        };

        LogLevel::parse(&level).unwrap_or_else(|| {
            warn!("Invalid logging level '{}', using CRITICAL", level);
            LogLevel::CRITICAL
        })
    }

    /// Log file of the package tool, only configurable through the environment
    pub fn logging_file(&self) -> Option<PathBuf> {
        self.env.var(ENV_LOGGING_FILE).map(PathBuf::from)
    }

    pub fn log_run_to_output(&self) -> bool {
        self.flag(ENV_LOG_RUN_TO_OUTPUT, "log", "run_to_output", true)
    }

    pub fn generate_run_log_file(&self) -> bool {
        self.flag(ENV_LOG_RUN_TO_FILE, "log", "run_to_file", false)
    }

    pub fn print_commands_to_output(&self) -> bool {
        self.flag(ENV_PRINT_RUN_COMMANDS, "log", "print_run_commands", false)
    }

    /// Resolved on first access and cached for the lifetime of this value
    pub fn non_interactive(&self) -> bool {
        *self
            .non_interactive
            .get_or_init(|| self.flag(ENV_NON_INTERACTIVE, "general", "non_interactive", false))
    }

    /// Force the non-interactive flag; later file changes do not affect it
    pub fn set_non_interactive(&mut self, value: bool) {
        debug!("Non-interactive mode forced to {}", value);
        self.non_interactive = OnceCell::with_value(value);
    }

    /// Number of parallel downloads, `None` when not configured
    pub fn parallel_download(&self) -> Result<Option<u32>> {
        let Some(parallel) = self.stored("general", "parallel_download")? else {
            return Ok(None);
        };

        parallel.trim().parse().map(Some).map_err(|_| {
            ConfigError::InvalidConfig(format!(
                "Specify a numeric parameter for 'parallel_download' (got '{}')",
                parallel
            ))
        })
    }

    /// Interval between automatic `config install` runs.
    ///
    /// A malformed interval is removed from `conan.conf` before the error is
    /// returned, so it is reported once instead of on every run.
    pub fn config_install_interval(&mut self) -> Result<Option<Duration>> {
        let path = ConfigPath::key("general", "config_install_interval");
        let interval = match self.file.get(&path) {
            Ok(interval) => interval,
            Err(e) if e.is_missing() => return Ok(None),
            Err(e) => return Err(e),
        };

        match parse_interval(&interval) {
            Ok(duration) => Ok(Some(duration)),
            Err(e) => {
                warn!("{}; removing {} from {}", e, path, self.file.path().display());
                self.file.remove(&path)?;
                Err(ConfigError::InvalidConfig(format!(
                    "Incorrect definition of {}: {}. Removing it from conan.conf to avoid possible loop error.",
                    path, interval
                )))
            }
        }
    }

    /// Proxy settings, `None` (use system proxies) without a `[proxies]` section
    pub fn proxies(&self) -> Option<ProxyMap> {
        match self.file.store().entries(PROXIES_SECTION) {
            Ok(entries) => Some(ProxyMap::parse(entries)),
            Err(_) => None,
        }
    }

    /// Hook names from `CONAN_HOOKS` (comma-separated) or the `[hooks]` section
    pub fn hooks(&self) -> Vec<String> {
        let from_env: Vec<String> = self
            .env
            .var(ENV_HOOKS)
            .map(|hooks| split_list(&hooks))
            .unwrap_or_default();
        if !from_env.is_empty() {
            return from_env;
        }

        self.file
            .store()
            .entries(HOOKS_SECTION)
            .map(|entries| entries.into_iter().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default()
    }

    /// CA bundle used for remote connections
    pub fn cacert_path(&self) -> Option<PathBuf> {
        self.resolve(ENV_CACERT_PATH, "general", "cacert_path")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    /// Version requirement for the package tool itself
    pub fn required_version(&self) -> Option<String> {
        self.file
            .get(&ConfigPath::key("general", "required_conan_version"))
            .ok()
    }

    /// Every typed setting at once.
    ///
    /// Fails like the individual accessors do, including the self-healing
    /// removal of a malformed install interval.
    pub fn settings(&mut self) -> Result<Settings> {
        let config_install_interval = self.config_install_interval()?;
        Ok(Settings {
            logging_level: self.logging_level(),
            logging_file: self.logging_file(),
            log_run_to_output: self.log_run_to_output(),
            generate_run_log_file: self.generate_run_log_file(),
            print_commands_to_output: self.print_commands_to_output(),
            non_interactive: self.non_interactive(),
            parallel_download: self.parallel_download()?,
            config_install_interval,
            proxies: self.proxies(),
            hooks: self.hooks(),
            cacert_path: self.cacert_path(),
            required_version: self.required_version(),
        })
    }

    fn resolve(&self, env_var: &str, section: &str, key: &str) -> Option<String> {
        self.resolver()
            .resolve(env_var, &ConfigPath::key(section, key), None)
    }

    fn flag(&self, env_var: &str, section: &str, key: &str, default: bool) -> bool {
        self.resolve(env_var, section, key)
            .map_or(default, |value| is_truthy(&value))
    }

    /// Stored value, `None` when the section or key is missing
    fn stored(&self, section: &str, key: &str) -> Result<Option<String>> {
        match self.file.get(&ConfigPath::key(section, key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_missing() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("file", &self.file)
            .field("non_interactive", &self.non_interactive.get())
            .finish_non_exhaustive()
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
