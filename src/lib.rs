//! conan-conf: layered client configuration for the conan command line
//!
//! Settings are resolved from environment variables, the user's `conan.conf`
//! and compiled-in defaults, in that order, and exposed as typed values.
//!
//! # Main Features
//!
//! - Round-trip preserving `conan.conf` editing addressed by `section.key` paths
//! - A declarative table of environment overrides, exportable to child processes
//! - Typed accessors with safe defaults (log level, flags, proxies, hooks, intervals)
//!
//! # Example
//!
//! ```no_run
//! use conan_conf::config::{ClientConfig, ConfigPath};
//! use conan_conf::Result;
//!
//! fn main() -> Result<()> {
//!     let mut config = ClientConfig::load("/home/user/.conan/conan.conf")?;
//!
//!     // Environment first, then conan.conf, then the default
//!     println!("logging level: {}", config.logging_level());
//!
//!     // Every mutation rewrites the file, keeping untouched lines as they were
//!     config
//!         .file_mut()
//!         .set(&ConfigPath::parse("general.parallel_download")?, "8")?;
//!     assert_eq!(config.parallel_download()?, Some(8));
//!
//!     Ok(())
//! }
//! ```

// Public modules
pub mod common;
pub mod config;

// Re-export commonly used structures and functions for convenience
pub use common::{ConfError, Result};
pub use config::{ClientConfig, ConfigError, ConfigPath, ConfigStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
