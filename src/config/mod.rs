//! Configuration module
//!
//! This module resolves the client configuration from three layered sources,
//! highest priority first:
//!
//! 1. Environment variables
//! 2. The `conan.conf` file
//! 3. Compiled-in defaults
//!
//! The file is modelled by a line-preserving [`ConfigStore`] addressed with
//! dotted [`ConfigPath`]s; [`ClientConfig`] exposes the typed settings.

// Submodules
mod client;
pub mod defaults;
pub mod duration;
pub mod error;
mod file;
mod path;
pub mod proxy;
mod resolver;
pub mod source;
mod store;
mod types;

// Re-export types and traits
pub use self::client::{ClientConfig, Settings};
pub use self::defaults::{config_path, default_client_conf, DEFAULT_CONFIG_FILE, SETTINGS};
pub use self::duration::parse_interval;
pub use self::error::{ConfigError, Result};
pub use self::file::ConfigFile;
pub use self::path::ConfigPath;
pub use self::proxy::ProxyMap;
pub use self::resolver::{unquote, Resolver};
pub use self::source::{EnvSource, MapEnv, ProcessEnv};
pub use self::store::ConfigStore;
pub use self::types::{LogLevel, ValueSource};
