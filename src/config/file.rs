//! Backing file for the configuration store
//!
//! [`ConfigFile`] owns the parsed [`ConfigStore`] for the lifetime of the
//! process and rewrites the whole file after every mutation.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::common::fs::{LocalFs, Storage};
use crate::config::error::{ConfigError, Result};
use crate::config::path::ConfigPath;
use crate::config::store::ConfigStore;

/// A configuration store bound to its file
pub struct ConfigFile {
    path: PathBuf,
    storage: Box<dyn Storage>,
    store: ConfigStore,
}

impl ConfigFile {
    /// Open a configuration file on the local file system
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, Box::new(LocalFs))
    }

    /// Open a configuration file through the given storage.
    ///
    /// A missing file is treated as an empty document; it is created by the
    /// first mutation.
    pub fn open_with<P: AsRef<Path>>(path: P, storage: Box<dyn Storage>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let store = match storage.load(&path) {
            Ok(text) => ConfigStore::parse(&text).map_err(|e| {
                warn!("Error parsing {}: {}", path.display(), e);
                e
            })?,
            Err(ConfigError::NotFound(_)) => {
                debug!("Configuration file not found: {}, starting empty", path.display());
                ConfigStore::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Self { path, storage, store })
    }

    /// Wrap an already parsed store; nothing is read from `path`
    pub fn from_store<P: AsRef<Path>>(path: P, store: ConfigStore, storage: Box<dyn Storage>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            storage,
            store,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// See [`ConfigStore::get`]
    pub fn get(&self, path: &ConfigPath) -> Result<String> {
        self.store.get(path)
    }

    /// Store a value and persist the file.
    ///
    /// The in-memory document only changes once the file has been written.
    pub fn set(&mut self, path: &ConfigPath, value: &str) -> Result<()> {
        let mut store = self.store.clone();
        store.set(path, value)?;
        self.commit(store)?;
        debug!("Set {} in {}", path, self.path.display());
        Ok(())
    }

    /// Remove a key or a whole section and persist the file
    pub fn remove(&mut self, path: &ConfigPath) -> Result<()> {
        let mut store = self.store.clone();
        store.remove(path)?;
        self.commit(store)?;
        debug!("Removed {} from {}", path, self.path.display());
        Ok(())
    }

    /// Full text of the document as it would be written
    pub fn dump(&self) -> String {
        self.store.render()
    }

    fn commit(&mut self, store: ConfigStore) -> Result<()> {
        self.storage.save(&self.path, &store.render())?;
        self.store = store;
        Ok(())
    }
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("path", &self.path)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fs::MockStorage;
    use std::fs;
    use tempfile::tempdir;

    fn path(text: &str) -> ConfigPath {
        ConfigPath::parse(text).unwrap()
    }

    #[test]
    fn test_missing_file_starts_empty_and_is_created_on_set() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("conan.conf");

        let mut file = ConfigFile::open(&file_path).unwrap();
        assert!(file.store().is_empty());
        assert!(!file_path.exists());

        file.set(&path("general.cpu_count"), "4").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "[general]\ncpu_count = 4\n");
    }

    #[test]
    fn test_every_mutation_rewrites_the_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("conan.conf");
        fs::write(&file_path, "# mine\n[log]\nlevel = info\n\n[hooks]\nchecker\n").unwrap();

        let mut file = ConfigFile::open(&file_path).unwrap();
        file.remove(&path("hooks")).unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# mine\n[log]\nlevel = info\n\n");

        file.set(&path("log.level"), "debug").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# mine\n[log]\nlevel = debug\n\n");

        let reopened = ConfigFile::open(&file_path).unwrap();
        assert_eq!(reopened.get(&path("log.level")).unwrap(), "debug");
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("conan.conf");
        fs::write(&file_path, "level = debug\n").unwrap();

        assert!(matches!(
            ConfigFile::open(&file_path),
            Err(ConfigError::Format { line: 1, .. })
        ));
    }

    #[test]
    fn test_failed_mutation_does_not_write() {
        let mut storage = MockStorage::new();
        storage.expect_load().returning(|_| Ok("[log]\nlevel = info\n".to_string()));
        storage.expect_save().never();

        let mut file = ConfigFile::open_with("conan.conf", Box::new(storage)).unwrap();
        assert!(matches!(file.remove(&path("proxies")), Err(ConfigError::MissingSection(_))));
        assert!(matches!(file.set(&path("log"), "x"), Err(ConfigError::InvalidPath(_))));
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut storage = MockStorage::new();
        storage
            .expect_load()
            .returning(|p| Err(ConfigError::NotFound(p.to_path_buf())));
        storage
            .expect_save()
            .withf(|p, text| p == Path::new("conan.conf") && text == "[general]\nparallel_download = 8\n")
            .times(1)
            .returning(|p, _| Err(ConfigError::Io(p.to_path_buf(), "disk full".to_string())));

        let mut file = ConfigFile::open_with("conan.conf", Box::new(storage)).unwrap();
        let result = file.set(&path("general.parallel_download"), "8");
        assert!(matches!(result, Err(ConfigError::Io(_, ref msg)) if msg == "disk full"));
        assert_eq!(
            file.get(&path("general.parallel_download")),
            Err(ConfigError::MissingSection("general".to_string()))
        );
        assert!(file.store().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_previous_state() {
        let mut storage = MockStorage::new();
        storage
            .expect_load()
            .returning(|_| Ok("[general]\nconfig_install_interval = bad\n".to_string()));
        storage
            .expect_save()
            .times(2)
            .returning(|p, _| Err(ConfigError::Io(p.to_path_buf(), "read-only".to_string())));

        let mut file = ConfigFile::open_with("conan.conf", Box::new(storage)).unwrap();
        let interval = path("general.config_install_interval");

        assert!(matches!(file.remove(&interval), Err(ConfigError::Io(_, _))));
        assert_eq!(file.get(&interval).unwrap(), "bad");

        assert!(matches!(file.set(&interval, "1h"), Err(ConfigError::Io(_, _))));
        assert_eq!(file.get(&interval).unwrap(), "bad");
        assert_eq!(file.dump(), "[general]\nconfig_install_interval = bad\n");
    }

    #[test]
    fn test_read_failure_propagates() {
        let mut storage = MockStorage::new();
        storage
            .expect_load()
            .returning(|p| Err(ConfigError::Io(p.to_path_buf(), "permission denied".to_string())));

        assert!(matches!(
            ConfigFile::open_with("conan.conf", Box::new(storage)),
            Err(ConfigError::Io(_, _))
        ));
    }
}
