//! Persistence of the settings record in a key-value backend.
//!
//! Each frontend provides a [`KeyValueStore`] (browser `localStorage`, a JSON
//! file on desktop, or [`MemoryStore`] in tests). Saving always writes the
//! complete record under [`SETTINGS_STORAGE_KEY`]; there is no versioning and
//! no partial update.

use crate::constants::SETTINGS_STORAGE_KEY;
use crate::settings::Settings;
use fnv::FnvHashMap;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend rejected the write: {0}")]
    Rejected(String),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store, used by tests and as a fallback when no backend exists.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FnvHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON file holding an object of key to string value. A missing file reads
/// as empty; every write rewrites the whole file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(StoreError::Unavailable(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(match self.read_entries()?.remove(key) {
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
            None => None,
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // an unreadable file is replaced rather than blocking the save
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_string(), Value::String(value.to_string()));
        let json = serde_json::to_string_pretty(&Value::Object(entries))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Serialize the full record, overwriting whatever was saved before.
pub fn save_settings(store: &mut dyn KeyValueStore, settings: &Settings) -> Result<(), StoreError> {
    let json = settings.to_json()?;
    store.set(SETTINGS_STORAGE_KEY, &json)?;
    log::info!("[settings] saved defaults: {json}");
    Ok(())
}

/// Read the saved record, if any.
///
/// Returns `None` when nothing was saved, the backend failed, or the record
/// is not a JSON object; the caller keeps its current defaults in that case.
pub fn load_settings(store: &dyn KeyValueStore) -> Option<Settings> {
    let raw = match store.get(SETTINGS_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::info!("[settings] no saved defaults");
            return None;
        }
        Err(e) => {
            log::warn!("[settings] could not read saved defaults: {e}");
            return None;
        }
    };
    match Settings::from_json(&raw) {
        Ok(settings) => {
            log::info!("[settings] loaded saved defaults");
            Some(settings)
        }
        Err(e) => {
            log::warn!("[settings] ignoring unparsable saved defaults: {e}");
            None
        }
    }
}
