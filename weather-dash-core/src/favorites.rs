//! Favorite cities and the key-value store they persist to.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;
use tracing::{debug, warn};

/// Store key holding the JSON array of favorite city names.
pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to serialize favorites: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable string storage.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, value).map_err(|source| StoreError::Write { path, source })
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Ordered, duplicate-free list of city names.
///
/// Every mutation rewrites the whole list to the store.
#[derive(Debug)]
pub struct Favorites {
    cities: Vec<String>,
    store: Box<dyn KeyValueStore>,
}

impl Favorites {
    /// Read the list once. A missing, unreadable or malformed value gives an empty list.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let cities = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "stored favorites are malformed, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read favorites, starting empty");
                Vec::new()
            }
        };

        debug!(count = cities.len(), "loaded favorites");
        Self { cities, store }
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cities.iter().any(|c| c == name)
    }

    /// Append `name` unless already present (exact match).
    ///
    /// Returns `Ok(false)` when it was a duplicate and nothing was written.
    pub fn add(&mut self, name: &str) -> Result<bool, StoreError> {
        if self.contains(name) {
            return Ok(false);
        }

        self.cities.push(name.to_string());
        self.persist()?;
        Ok(true)
    }

    /// Remove every entry equal to `name`. The list is written even when nothing matched.
    pub fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        self.cities.retain(|c| c != name);
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.cities)?;
        self.store.set(FAVORITES_KEY, &json)
    }
}
