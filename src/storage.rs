//! Durable key-value storage for the explicit theme preference.
//!
//! The provider never probes its environment to decide whether storage
//! exists. Hosts inject a [`PreferenceStorage`] instead: a real backend
//! where one is available, [`NoopStorage`] where it isn't.
//!
//! Writes are fire-and-forget. Backends that can fail (the filesystem,
//! the browser) log the failure and carry on.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// A string key-value store.
///
/// Methods take `&self`: a store is shared between the provider, the
/// bootstrap collaborator and the host, all on one thread.
pub trait PreferenceStorage {
    /// Returns the stored value, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str);
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one entry already present.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.set(key, value);
        storage
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Storage for environments without persistence. Always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStorage;

impl PreferenceStorage for NoopStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, key: &str, _value: &str) {
        log::trace!("NoopStorage: dropping write to '{}'", key);
    }

    fn remove(&self, _key: &str) {}
}

/// Storage backed by a JSON object on disk.
///
/// The file is re-read on every access so several processes sharing it
/// see each other's changes. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/expo-theme/preferences.json`, when the platform has a
    /// config directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("expo-theme").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let source = match std::fs::read_to_string(&self.path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                log::warn!("Failed to read preferences {:?}: {}", self.path, e);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&source) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring malformed preferences {:?}: {}", self.path, e);
                BTreeMap::new()
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create {:?}: {}", parent, e);
                return;
            }
        }
        let json = match serde_json::to_string_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize preferences: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            log::warn!("Failed to write preferences {:?}: {}", self.path, e);
        }
    }
}

impl PreferenceStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries);
        }
    }
}
