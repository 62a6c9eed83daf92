//! File system access for the configuration file
//!
//! The configuration core only needs to load and save whole documents, so
//! the file system is reached through the small [`Storage`] trait.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::config::error::{ConfigError, Result};

/// Whole-file load/save contract
#[cfg_attr(test, mockall::automock)]
pub trait Storage {
    /// Read the whole file. Fails with `NotFound` when it does not exist.
    fn load(&self, path: &Path) -> Result<String>;

    /// Replace the whole file with `text`
    fn save(&self, path: &Path, text: &str) -> Result<()>;
}

/// [`Storage`] backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl Storage for LocalFs {
    fn load(&self, path: &Path) -> Result<String> {
        debug!("Reading {}", path.display());
        fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(path.to_path_buf(), e.to_string()),
        })
    }

    fn save(&self, path: &Path, text: &str) -> Result<()> {
        debug!("Writing {} bytes to {}", text.len(), path.display());
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(parent.to_path_buf(), e.to_string()))?;
        }
        fs::write(path, text).map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))
    }
}
