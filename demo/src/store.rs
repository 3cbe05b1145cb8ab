use std::{collections::BTreeMap, path::PathBuf};

use tracing::{debug, info};

use crate::error::StoreError;

/// A flat string key-value store persisted as one JSON object, in the manner of browser local
/// storage. The file is read once on open and rewritten in full on every mutation.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store at `path`, creating parent directories. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        info!("LocalStore: opened {} with {} keys", path.display(), entries.len());
        Ok(Self { path: Some(path), entries })
    }

    /// A store that is never written to disk
    pub fn in_memory() -> Self { Self { path: None, entries: BTreeMap::new() } }

    pub fn get(&self, key: &str) -> Option<&str> { self.entries.get(key).map(String::as_str) }

    /// Store `value` under `key`. If the file cannot be written the previous value is kept.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), StoreError> {
        let key = key.into();
        let previous = self.entries.insert(key.clone(), value.into());
        let result = self.flush();
        if result.is_err() {
            match previous {
                Some(previous) => self.entries.insert(key, previous),
                None => self.entries.remove(&key),
            };
        }
        result
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        let Some(removed) = self.entries.remove(key) else { return Ok(None) };
        match self.flush() {
            Ok(()) => Ok(Some(removed)),
            Err(e) => {
                self.entries.insert(key.to_string(), removed);
                Err(e)
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> { self.entries.keys().map(String::as_str) }

    pub fn path(&self) -> Option<&std::path::Path> { self.path.as_deref() }

    fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else { return Ok(()) };
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        std::fs::write(path, bytes)?;
        debug!("LocalStore: wrote {} keys to {}", self.entries.len(), path.display());
        Ok(())
    }
}
