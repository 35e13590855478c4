//! Durable progress storage
//!
//! A tiny key-value interface for integers that must survive process restarts
//! (the achieved level). Last write wins; there are no transactions.
//!
//! Backends:
//! - `MemoryStore`: in-process, for tests and headless runs
//! - `JsonFileStore`: JSON object on disk, written via tmp file + rename
//! - `LocalStorageStore`: browser LocalStorage (wasm32 only)

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Get/put interface over durable integer values
pub trait ProgressStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError>;
    fn put(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

/// Volatile store backed by a map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store (handy for resuming a known profile)
    pub fn with_value(key: &str, value: u32) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value);
        store
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn put(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as a flat JSON object, e.g. `{"achieved_level": 7}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u32>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl ProgressStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn put(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(StoreError::Json(err)) => {
                log::warn!(
                    "Replacing corrupt progress file {}: {}",
                    self.path.display(),
                    err
                );
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        values.insert(key.to_string(), value);
        let json = serde_json::to_string_pretty(&values)?;

        // Write the temp file first so a crash never leaves a half-written store
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Stored {}={} in {}", key, value, self.path.display());
        Ok(())
    }
}

/// The window's LocalStorage, if the browser exposes one
#[cfg(target_arch = "wasm32")]
pub(crate) fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StoreError::Unavailable)
}

/// Browser LocalStorage backend
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    prefix: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[cfg(target_arch = "wasm32")]
impl ProgressStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        let storage = local_storage()?;
        match storage.get_item(&self.full_key(key)) {
            Ok(Some(raw)) => Ok(Some(serde_json::from_str(&raw)?)),
            Ok(None) => Ok(None),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn put(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        let storage = local_storage()?;
        storage
            .set_item(&self.full_key(key), &value.to_string())
            .map_err(|_| StoreError::Unavailable)
    }
}
